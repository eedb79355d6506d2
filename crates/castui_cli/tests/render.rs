use std::fs;
use std::path::Path;
use std::path::PathBuf;

use castui_cli::ErrorKind;
use castui_cli::Network;
use castui_cli::Renderer;
use castui_cli::error::RenderError;
use castui_cli::ir::ui::ArgIr;
use castui_cli::ir::ui::InstructionIr;
use castui_cli::ir::ui::RenderInput;
use castui_cli::ir::ui::UiType;
use castui_cli::render::RenderOptions;
use castui_cli::render::metadata::read_metadata;
use chrono::TimeZone;
use chrono::Utc;

const APP_TEMPLATE: &str = "const CLUSTER = [{{ network }}, {{ rpcEndpoint }}]; const ID = {{ programId }};\n";
const PAGE_TEMPLATE: &str = "export const NAMES = [{{ programName }}, {{ instructionName }}, {{ instructionTitle }}];\nexport const IR = {{ instruction }};\n";

fn shipped_templates() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// Build a template set named `name` under `root` from `(relative path,
/// contents)` pairs.
fn write_template_set(root: &Path, name: &str, files: &[(&str, &str)]) {
	for (relative, contents) in files {
		let path = root.join(name).join(relative);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.unwrap_or_else(|e| panic!("failed to create {}: {e}", parent.display()));
		}
		fs::write(&path, contents)
			.unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));
	}
}

fn minimal_set(root: &Path) {
	write_template_set(root, "mini", &[
		("package.json", "{}\n"),
		("lib/util.ts", "export {};\n"),
		("pages/_app.tsx.tmpl", APP_TEMPLATE),
		("pages/instruction.tsx.tmpl", PAGE_TEMPLATE),
	]);
}

fn options(template: &str) -> RenderOptions {
	RenderOptions {
		template: template.to_owned(),
		program_id: None,
		network: Network::Devnet,
		idl_path: "idl.json".to_owned(),
		generated_at: Utc
			.with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
			.single()
			.unwrap_or_else(|| panic!("valid timestamp")),
	}
}

fn input(instructions: Vec<InstructionIr>) -> RenderInput {
	RenderInput {
		instructions,
		program_name: "demo".to_owned(),
		program_id: "Demo1111111111111111111111111111111111111111".to_owned(),
	}
}

fn instruction(name: &str) -> InstructionIr {
	InstructionIr {
		name: name.to_owned(),
		docs: Vec::new(),
		args: vec![ArgIr {
			name: "amount".to_owned(),
			ui_type: UiType::BigInt,
			required: true,
			docs: Vec::new(),
			children: Vec::new(),
			options: Vec::new(),
		}],
		accounts: Vec::new(),
	}
}

#[test]
fn empty_ir_renders_shell_and_metadata_only() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("app");
	let renderer = Renderer::new(shipped_templates());

	let summary = renderer
		.render(&input(Vec::new()), &out_dir, &options("shadcn"))
		.unwrap_or_else(|e| panic!("render failed: {e}"));

	assert!(summary.instruction_pages.is_empty());
	assert!(summary.copied_assets > 0);
	assert!(out_dir.join("pages/_app.tsx").is_file());
	assert!(out_dir.join("package.json").is_file());
	assert!(!out_dir.join("pages/_app.tsx.tmpl").exists());
	assert!(!out_dir.join("pages/instruction.tsx.tmpl").exists());

	let pages = fs::read_dir(out_dir.join("pages/instruction"))
		.unwrap_or_else(|e| panic!("instruction dir should exist: {e}"))
		.count();
	assert_eq!(pages, 0);

	let metadata = read_metadata(&out_dir).unwrap_or_else(|| panic!("metadata should exist"));
	assert_eq!(metadata, summary.metadata);
	assert_eq!(metadata.program_name, "demo");
	assert_eq!(metadata.template, "shadcn");
	assert_eq!(metadata.generated_at, "2024-05-01T12:30:00.000Z");
	assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn renders_every_shipped_template_set() {
	let renderer = Renderer::new(shipped_templates());
	let templates = renderer.available_templates();
	assert_eq!(templates, vec!["basic", "shadcn"]);

	for template in templates {
		let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
		let summary = renderer
			.render(
				&input(vec![instruction("initialize_market")]),
				out.path(),
				&options(&template),
			)
			.unwrap_or_else(|e| panic!("render of `{template}` failed: {e}"));

		let page = fs::read_to_string(&summary.instruction_pages[0])
			.unwrap_or_else(|e| panic!("page should be readable: {e}"));
		assert!(page.contains("\"uiType\": \"BigInt\""), "{template}: {page}");
		assert!(page.contains("Initialize Market"), "{template}: {page}");
		assert!(!page.contains("{{"), "{template}: {page}");

		let shell = fs::read_to_string(&summary.app_shell)
			.unwrap_or_else(|e| panic!("app shell should be readable: {e}"));
		assert!(shell.contains("Demo1111111111111111111111111111111111111111"));
		assert!(shell.contains("https://api.devnet.solana.com"));
	}
}

#[test]
fn writes_one_page_per_instruction() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	minimal_set(templates.path());
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	let summary = Renderer::new(templates.path())
		.render(
			&input(vec![instruction("deposit"), instruction("withdraw")]),
			out.path(),
			&options("mini"),
		)
		.unwrap_or_else(|e| panic!("render failed: {e}"));

	assert_eq!(summary.copied_assets, 2);
	assert_eq!(summary.instruction_pages, vec![
		out.path().join("pages/instruction/deposit.tsx"),
		out.path().join("pages/instruction/withdraw.tsx"),
	]);

	let deposit = fs::read_to_string(out.path().join("pages/instruction/deposit.tsx"))
		.unwrap_or_else(|e| panic!("deposit page should exist: {e}"));
	assert!(deposit.starts_with(
		"export const NAMES = [\"demo\", \"deposit\", \"Deposit\"];\nexport const IR = {\n"
	));
	assert!(deposit.contains("\"name\": \"amount\""));

	let shell = fs::read_to_string(out.path().join("pages/_app.tsx"))
		.unwrap_or_else(|e| panic!("app shell should exist: {e}"));
	insta::assert_snapshot!(shell.trim_end(), @r#"const CLUSTER = ["devnet", "https://api.devnet.solana.com"]; const ID = "Demo1111111111111111111111111111111111111111";"#);
}

#[test]
fn program_id_option_overrides_input() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	minimal_set(templates.path());
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	let mut options = options("mini");
	options.program_id = Some("Override11111111111111111111111111111111111".to_owned());
	options.network = Network::Mainnet;

	let summary = Renderer::new(templates.path())
		.render(&input(Vec::new()), out.path(), &options)
		.unwrap_or_else(|e| panic!("render failed: {e}"));

	assert_eq!(
		summary.metadata.program_id,
		"Override11111111111111111111111111111111111"
	);
	let shell = fs::read_to_string(summary.app_shell)
		.unwrap_or_else(|e| panic!("app shell should exist: {e}"));
	assert!(shell.contains("Override11111111111111111111111111111111111"));
	assert!(shell.contains("https://api.mainnet-beta.solana.com"));
}

#[test]
fn unknown_template_writes_nothing() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("app");

	let error = Renderer::new(shipped_templates())
		.render(&input(Vec::new()), &out_dir, &options("material"))
		.err()
		.unwrap_or_else(|| panic!("unknown template should fail"));

	assert_eq!(error.kind(), ErrorKind::TemplateNotFound);
	assert!(error.to_string().contains("basic, shadcn"), "{error}");
	assert!(!out_dir.exists());
}

#[test]
fn missing_substitution_template_writes_nothing() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_template_set(templates.path(), "partial", &[
		("package.json", "{}\n"),
		("pages/_app.tsx.tmpl", APP_TEMPLATE),
	]);
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("app");

	let error = Renderer::new(templates.path())
		.render(&input(Vec::new()), &out_dir, &options("partial"))
		.err()
		.unwrap_or_else(|| panic!("incomplete template set should fail"));

	assert!(matches!(error, RenderError::MissingTemplateFile { .. }));
	assert_eq!(error.kind(), ErrorKind::TemplateNotFound);
	assert!(!out_dir.exists());
}

#[test]
fn malformed_template_writes_nothing() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	write_template_set(templates.path(), "broken", &[
		("package.json", "{}\n"),
		("pages/_app.tsx.tmpl", APP_TEMPLATE),
		("pages/instruction.tsx.tmpl", "line one\n{{ instructionColor }}\n"),
	]);
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("app");

	let error = Renderer::new(templates.path())
		.render(&input(Vec::new()), &out_dir, &options("broken"))
		.err()
		.unwrap_or_else(|| panic!("malformed template should fail"));

	assert_eq!(error.kind(), ErrorKind::InvalidTemplate);
	assert!(
		matches!(error, RenderError::Template { line: 2, ref message, .. } if message.contains("instructionColor"))
	);
	assert!(!out_dir.exists());
}

#[test]
fn instruction_names_that_escape_fail_as_write_errors() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	minimal_set(templates.path());
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	let error = Renderer::new(templates.path())
		.render(&input(vec![instruction("../escape")]), out.path(), &options("mini"))
		.err()
		.unwrap_or_else(|| panic!("escaping name should fail"));

	assert_eq!(error.kind(), ErrorKind::WriteFailed);
	assert!(!out.path().join("pages/escape.tsx").exists());
}

#[test]
fn overwrites_generated_paths_and_keeps_other_files() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	minimal_set(templates.path());
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	fs::write(out.path().join("package.json"), "stale")
		.unwrap_or_else(|e| panic!("seed write failed: {e}"));
	fs::write(out.path().join("notes.md"), "keep me")
		.unwrap_or_else(|e| panic!("seed write failed: {e}"));

	let renderer = Renderer::new(templates.path());
	let run = || {
		renderer
			.render(&input(vec![instruction("deposit")]), out.path(), &options("mini"))
			.unwrap_or_else(|e| panic!("render failed: {e}"))
	};

	run();
	let first = fs::read(out.path().join("pages/instruction/deposit.tsx"))
		.unwrap_or_else(|e| panic!("page should exist: {e}"));
	run();
	let second = fs::read(out.path().join("pages/instruction/deposit.tsx"))
		.unwrap_or_else(|e| panic!("page should exist: {e}"));

	assert_eq!(first, second);
	assert_eq!(
		fs::read_to_string(out.path().join("package.json")).ok().as_deref(),
		Some("{}\n")
	);
	assert_eq!(
		fs::read_to_string(out.path().join("notes.md")).ok().as_deref(),
		Some("keep me")
	);
}

#[test]
fn duplicate_instruction_names_write_nothing() {
	let templates = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	minimal_set(templates.path());
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("app");
	let instructions = (0..64).map(|_| instruction("dup")).collect();

	let error = Renderer::new(templates.path())
		.render(&input(instructions), &out_dir, &options("mini"))
		.err()
		.unwrap_or_else(|| panic!("duplicate instruction names should fail"));

	assert!(matches!(error, RenderError::DuplicateInstruction { ref name } if name == "dup"));
	assert_eq!(error.kind(), ErrorKind::WriteFailed);
	assert!(!out_dir.exists());
}

#[test]
fn substituted_names_are_quoted_for_javascript() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let mut input = input(vec![instruction("say\"hi\"")]);
	input.program_name = "my\"prog".to_owned();

	let mut options = options("shadcn");
	options.program_id = Some("Back\\slash\n{<id>}".to_owned());

	let summary = Renderer::new(shipped_templates())
		.render(&input, out.path(), &options)
		.unwrap_or_else(|e| panic!("render failed: {e}"));

	let shell = fs::read_to_string(&summary.app_shell)
		.unwrap_or_else(|e| panic!("app shell should be readable: {e}"));
	assert!(shell.contains(r#"programName: "my\"prog","#), "{shell}");
	assert!(shell.contains(r#"programId: "Back\\slash\n{<id>}","#), "{shell}");

	let page = fs::read_to_string(&summary.instruction_pages[0])
		.unwrap_or_else(|e| panic!("page should be readable: {e}"));
	assert!(page.contains(r#"const PROGRAM_NAME = "my\"prog";"#), "{page}");
	assert!(page.contains(r#"const INSTRUCTION_NAME = "say\"hi\"";"#), "{page}");
	assert_eq!(summary.metadata.program_name, "my\"prog");
}
