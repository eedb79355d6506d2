//! Rendering of the UI IR against a template set into an output tree.
//!
//! A template set is a directory of static assets plus two substitution
//! templates (marked by the `.tmpl` extension): the app shell and the
//! instruction page. Rendering happens in a fixed order:
//!
//! 1. static assets are copied, overwriting existing files;
//! 2. the app shell is rendered;
//! 3. one page per instruction is rendered (in parallel);
//! 4. the generation metadata is written.
//!
//! Both substitution templates are read and validated, and every instruction
//! page name is checked, before anything is written. An unknown or malformed
//! template set therefore leaves the output directory untouched. Failures
//! after that point leave earlier writes in place.
//!
//! Every substituted value except `instruction` is inserted as a quoted
//! JavaScript string literal; `instruction` is the instruction IR as JSON.

pub mod metadata;
pub mod template;

use std::collections::HashSet;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use heck::ToTitleCase;
use rayon::prelude::*;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::RenderError;
use crate::ir::ui::InstructionIr;
use crate::ir::ui::RenderInput;
use crate::network::Network;
pub use crate::render::metadata::GenerationMetadata;
use crate::render::metadata::write_metadata;
use crate::render::template::Context;
use crate::render::template::Template;

/// Extension marking a file as a substitution template rather than a static
/// asset.
pub const TEMPLATE_EXTENSION: &str = "tmpl";

pub const APP_TEMPLATE: &str = "pages/_app.tsx.tmpl";
pub const INSTRUCTION_TEMPLATE: &str = "pages/instruction.tsx.tmpl";
pub const APP_OUTPUT: &str = "pages/_app.tsx";
pub const INSTRUCTION_DIR: &str = "pages/instruction";
pub const INSTRUCTION_EXTENSION: &str = "tsx";

const APP_KEYS: &[&str] = &["programId", "programName", "network", "rpcEndpoint"];
const INSTRUCTION_KEYS: &[&str] = &[
	"programId",
	"programName",
	"network",
	"rpcEndpoint",
	"instructionName",
	"instructionTitle",
	"instruction",
];

/// Per-run rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
	/// Name of the template set (a directory under the templates root).
	pub template: String,
	/// Overrides [`RenderInput::program_id`] when set.
	pub program_id: Option<String>,
	pub network: Network,
	/// Descriptor path as supplied by the caller, recorded in the metadata.
	pub idl_path: String,
	pub generated_at: DateTime<Utc>,
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
	pub copied_assets: usize,
	pub app_shell: PathBuf,
	pub instruction_pages: Vec<PathBuf>,
	pub metadata_path: PathBuf,
	pub metadata: GenerationMetadata,
}

/// Renders IR into output trees using template sets found under a fixed
/// templates root.
#[derive(Debug, Clone)]
pub struct Renderer {
	templates_root: PathBuf,
}

impl Renderer {
	pub fn new(templates_root: impl Into<PathBuf>) -> Self {
		Self {
			templates_root: templates_root.into(),
		}
	}

	pub fn templates_root(&self) -> &Path {
		&self.templates_root
	}

	/// Names of the template sets under the templates root, sorted. An
	/// unreadable root yields an empty list.
	pub fn available_templates(&self) -> Vec<String> {
		let Ok(entries) = std::fs::read_dir(&self.templates_root) else {
			return Vec::new();
		};

		let mut names = entries
			.filter_map(Result::ok)
			.filter(|entry| entry.path().is_dir())
			.filter_map(|entry| entry.file_name().into_string().ok())
			.collect::<Vec<_>>();
		names.sort();
		names
	}

	/// Directory of the template set `name`.
	pub fn resolve_template(&self, name: &str) -> Result<PathBuf, RenderError> {
		let mut components = Path::new(name).components();
		let is_plain_name = matches!(
			(components.next(), components.next()),
			(Some(Component::Normal(_)), None)
		);
		let dir = self.templates_root.join(name);

		if is_plain_name && dir.is_dir() {
			return Ok(dir);
		}

		let available = self.available_templates();
		Err(RenderError::TemplateNotFound {
			name: name.to_owned(),
			root: self.templates_root.clone(),
			available: if available.is_empty() {
				"(none)".to_owned()
			} else {
				available.join(", ")
			},
		})
	}

	/// Render `input` into `out_dir`.
	pub fn render(
		&self,
		input: &RenderInput,
		out_dir: &Path,
		options: &RenderOptions,
	) -> Result<RenderSummary, RenderError> {
		let template_dir = self.resolve_template(&options.template)?;
		let app_template = load_template(&template_dir, &options.template, APP_TEMPLATE, APP_KEYS)?;
		let instruction_template = load_template(
			&template_dir,
			&options.template,
			INSTRUCTION_TEMPLATE,
			INSTRUCTION_KEYS,
		)?;

		let file_names = instruction_file_names(&input.instructions)?;

		let program_id = options
			.program_id
			.clone()
			.unwrap_or_else(|| input.program_id.clone());
		let base = Context::new()
			.with("programId", js_string(&program_id))
			.with("programName", js_string(&input.program_name))
			.with("network", js_string(options.network.as_str()))
			.with("rpcEndpoint", js_string(options.network.rpc_endpoint()));

		create_dir(out_dir)?;
		let copied_assets = copy_static_assets(&template_dir, out_dir)?;
		tracing::info!(
			template = %options.template,
			copied_assets,
			"copied static assets"
		);

		let app_shell = out_dir.join(APP_OUTPUT);
		write_file(&app_shell, &app_template.render(&base))?;
		tracing::debug!(path = %app_shell.display(), "rendered app shell");

		let instruction_dir = out_dir.join(INSTRUCTION_DIR);
		create_dir(&instruction_dir)?;
		let instruction_pages = input
			.instructions
			.par_iter()
			.zip(file_names.par_iter())
			.map(|(instruction, file_name)| {
				render_instruction_page(
					&instruction_template,
					&base,
					instruction,
					&instruction_dir.join(file_name),
				)
			})
			.collect::<Result<Vec<_>, _>>()?;
		tracing::info!(
			pages = instruction_pages.len(),
			"rendered instruction pages"
		);

		let metadata = GenerationMetadata {
			idl_path: options.idl_path.clone(),
			program_name: input.program_name.clone(),
			program_id,
			template: options.template.clone(),
			network: options.network,
			generated_at: options
				.generated_at
				.to_rfc3339_opts(SecondsFormat::Millis, true),
			version: env!("CARGO_PKG_VERSION").to_owned(),
		};
		let metadata_path = write_metadata(out_dir, &metadata)?;
		tracing::debug!(path = %metadata_path.display(), "wrote generation metadata");

		Ok(RenderSummary {
			copied_assets,
			app_shell,
			instruction_pages,
			metadata_path,
			metadata,
		})
	}
}

fn load_template(
	template_dir: &Path,
	template_name: &str,
	relative: &str,
	keys: &[&str],
) -> Result<Template, RenderError> {
	let path = template_dir.join(relative);
	if !path.is_file() {
		return Err(RenderError::MissingTemplateFile {
			template: template_name.to_owned(),
			file: PathBuf::from(relative),
		});
	}

	let source = std::fs::read_to_string(&path).map_err(|source| {
		RenderError::ReadTemplate {
			path: path.clone(),
			source,
		}
	})?;
	Template::parse(&path, &source, keys)
}

fn render_instruction_page(
	template: &Template,
	base: &Context,
	instruction: &InstructionIr,
	path: &Path,
) -> Result<PathBuf, RenderError> {
	let json = serde_json::to_string_pretty(instruction).map_err(|source| {
		RenderError::Serialize {
			context: instruction.name.clone(),
			source,
		}
	})?;

	let context = base
		.clone()
		.with("instructionName", js_string(&instruction.name))
		.with("instructionTitle", js_string(&instruction.name.to_title_case()))
		.with("instruction", json);

	write_file(path, &template.render(&context))?;
	tracing::debug!(
		path = %path.display(),
		template = %template.path().display(),
		"rendered instruction page"
	);
	Ok(path.to_path_buf())
}

/// Quote `value` as a JavaScript string literal.
fn js_string(value: &str) -> String {
	Value::from(value).to_string()
}

/// File names for every instruction page, checked before anything is
/// written. Two instructions may not share a page.
fn instruction_file_names(instructions: &[InstructionIr]) -> Result<Vec<String>, RenderError> {
	let mut seen = HashSet::new();
	instructions
		.iter()
		.map(|instruction| {
			if !seen.insert(instruction.name.as_str()) {
				return Err(RenderError::DuplicateInstruction {
					name: instruction.name.clone(),
				});
			}
			instruction_file_name(&instruction.name)
		})
		.collect()
}

/// `<name>.tsx`, refusing names that would escape the instruction directory.
fn instruction_file_name(name: &str) -> Result<String, RenderError> {
	let invalid = name.is_empty()
		|| name == "."
		|| name == ".."
		|| name.contains(['/', '\\'])
		|| name.contains('\0');

	if invalid {
		return Err(RenderError::InvalidFileName {
			name: name.to_owned(),
		});
	}

	Ok(format!("{name}.{INSTRUCTION_EXTENSION}"))
}

fn is_substitution_template(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION)
}

/// Copy every non-template file of `template_dir` into `out_dir`, keeping
/// relative paths. Returns the number of files copied.
fn copy_static_assets(template_dir: &Path, out_dir: &Path) -> Result<usize, RenderError> {
	let mut copied = 0;

	for entry in WalkDir::new(template_dir)
		.follow_links(true)
		.sort_by_file_name()
	{
		let entry = entry.map_err(|source| {
			RenderError::WalkTemplate {
				path: template_dir.to_path_buf(),
				source,
			}
		})?;

		if !entry.file_type().is_file() || is_substitution_template(entry.path()) {
			continue;
		}

		let Ok(relative) = entry.path().strip_prefix(template_dir) else {
			continue;
		};
		let target = out_dir.join(relative);
		if let Some(parent) = target.parent() {
			create_dir(parent)?;
		}

		std::fs::copy(entry.path(), &target).map_err(|source| {
			RenderError::CopyAsset {
				from: entry.path().to_path_buf(),
				to: target.clone(),
				source,
			}
		})?;
		copied += 1;
	}

	Ok(copied)
}

fn create_dir(path: &Path) -> Result<(), RenderError> {
	std::fs::create_dir_all(path).map_err(|source| {
		RenderError::CreateDir {
			path: path.to_path_buf(),
			source,
		}
	})
}

fn write_file(path: &Path, contents: &str) -> Result<(), RenderError> {
	if let Some(parent) = path.parent() {
		create_dir(parent)?;
	}

	std::fs::write(path, contents).map_err(|source| {
		RenderError::WriteFile {
			path: path.to_path_buf(),
			source,
		}
	})
}
