use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

fn fixture(name: &str) -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR"))
		.join("tests/fixtures")
		.join(name)
}

fn workspace_root() -> &'static Path {
	Path::new(env!("CARGO_MANIFEST_DIR"))
		.parent()
		.and_then(|path| path.parent())
		.unwrap_or_else(|| Path::new("."))
}

fn templates_dir() -> PathBuf {
	workspace_root().join("templates")
}

fn castui(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_castui"))
		.args(args)
		.arg("--templates-dir")
		.arg(templates_dir())
		.env_remove("RUST_LOG")
		.output()
		.unwrap_or_else(|err| panic!("failed to execute castui binary: {err}"))
}

fn path_arg(path: &Path) -> &str {
	path.to_str()
		.unwrap_or_else(|| panic!("non UTF-8 path: {}", path.display()))
}

#[test]
fn generates_without_install() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("anchor-ui");
	let idl = fixture("simple_idl.json");

	let output = castui(&[
		"--idl",
		path_arg(&idl),
		"--out",
		path_arg(&out_dir),
		"--no-install",
	]);

	assert!(
		output.status.success(),
		"expected successful generation, stderr: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("Generated"), "stdout: {stdout}");
	assert!(stdout.contains("simpleProgram"), "stdout: {stdout}");
	assert!(out_dir.join("pages/instruction/initialize.tsx").is_file());
	assert!(out_dir.join(".castui/metadata.json").is_file());
	assert!(!out_dir.join(".castui/install.log").exists());
}

#[test]
fn lists_available_templates() {
	let output = castui(&["--list-templates"]);

	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout), "basic\nshadcn\n");
}

#[test]
fn unknown_template_exits_with_failure() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("anchor-ui");
	let idl = fixture("simple_idl.json");

	let output = castui(&[
		"--idl",
		path_arg(&idl),
		"--out",
		path_arg(&out_dir),
		"--template",
		"material",
		"--no-install",
	]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("Template `material` not found"), "stderr: {stderr}");
	assert!(stderr.contains("--list-templates"), "stderr: {stderr}");
	assert!(!out_dir.exists());
}

#[test]
fn invalid_descriptor_exits_with_failure() {
	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let idl = out.path().join("idl.json");
	fs::write(&idl, "not json").unwrap_or_else(|e| panic!("seed write: {e}"));

	let output = castui(&["--idl", path_arg(&idl), "--out", path_arg(out.path()), "--no-install"]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("not valid JSON"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn failed_install_keeps_generated_files() {
	use std::os::unix::fs::PermissionsExt;

	let out = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	let out_dir = out.path().join("anchor-ui");
	let idl = fixture("simple_idl.json");

	let fake_manager = out.path().join("fake-pm");
	fs::write(
		&fake_manager,
		"#!/bin/sh\necho \"resolving packages\"\necho \"registry unreachable\" >&2\nexit 3\n",
	)
	.unwrap_or_else(|e| panic!("failed to write fake package manager: {e}"));
	fs::set_permissions(&fake_manager, fs::Permissions::from_mode(0o755))
		.unwrap_or_else(|e| panic!("failed to mark fake package manager executable: {e}"));

	let output = castui(&[
		"--idl",
		path_arg(&idl),
		"--out",
		path_arg(&out_dir),
		"--package-manager",
		path_arg(&fake_manager),
	]);

	assert_eq!(
		output.status.code(),
		Some(2),
		"stderr: {}",
		String::from_utf8_lossy(&output.stderr)
	);
	assert!(out_dir.join("pages/instruction/initialize.tsx").is_file());
	assert!(out_dir.join(".castui/metadata.json").is_file());

	let log = fs::read_to_string(out_dir.join(".castui/install.log"))
		.unwrap_or_else(|e| panic!("install log should exist: {e}"));
	assert!(log.contains("failed with status 3"), "log: {log}");
	assert!(log.contains("registry unreachable"), "log: {log}");
	assert!(log.contains("resolving packages"), "log: {log}");
}
