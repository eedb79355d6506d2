use std::path::PathBuf;

use chrono::Utc;

use crate::error::GenerateError;
use crate::ir::ui::RenderInput;
use crate::mapper::map_root;
use crate::network::Network;
use crate::parse::parse_descriptor_file;
use crate::render::RenderOptions;
use crate::render::RenderSummary;
use crate::render::Renderer;

/// Program id used when neither the caller nor the descriptor provides one.
pub const PLACEHOLDER_PROGRAM_ID: &str = "YourProgramIdHere";

#[derive(Debug, Clone)]
pub struct GenerateOptions {
	pub idl_path: PathBuf,
	pub out_dir: PathBuf,
	pub template: String,
	pub network: Network,
	/// Takes precedence over the address declared in the descriptor.
	pub program_id: Option<String>,
	/// Directory holding the template sets, resolved by the caller.
	pub templates_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
	pub program_name: String,
	pub summary: RenderSummary,
}

/// Run the full pipeline: parse the descriptor, map it to the UI IR and
/// render it into `options.out_dir`.
///
/// The generation timestamp is taken once, when this function is entered.
pub fn generate(options: &GenerateOptions) -> Result<GenerateOutcome, GenerateError> {
	let generated_at = Utc::now();

	let root = parse_descriptor_file(&options.idl_path).map_err(|source| {
		GenerateError::Descriptor {
			path: options.idl_path.clone(),
			source,
		}
	})?;
	tracing::info!(
		program = %root.name,
		version = %root.version,
		instructions = root.instructions.len(),
		"parsed descriptor"
	);

	let instructions = map_root(&root);
	let input = RenderInput {
		instructions,
		program_id: root
			.address
			.clone()
			.unwrap_or_else(|| PLACEHOLDER_PROGRAM_ID.to_owned()),
		program_name: root.name,
	};

	let renderer = Renderer::new(&options.templates_dir);
	let render_options = RenderOptions {
		template: options.template.clone(),
		program_id: options.program_id.clone(),
		network: options.network,
		idl_path: options.idl_path.display().to_string(),
		generated_at,
	};
	let summary = renderer.render(&input, &options.out_dir, &render_options)?;

	Ok(GenerateOutcome {
		program_name: input.program_name,
		summary,
	})
}
