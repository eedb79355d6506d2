//! Optional post-generation dependency install.
//!
//! Runs only after the metadata file has been written, so a failed install
//! never removes the evidence of a successful generation.

use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use crate::error::InstallError;
use crate::render::metadata::METADATA_DIR;

pub const INSTALL_LOG_FILE: &str = "install.log";

/// Path of the install log for `out_dir`.
pub fn install_log_path(out_dir: &Path) -> PathBuf {
	out_dir.join(METADATA_DIR).join(INSTALL_LOG_FILE)
}

/// Run `<package_manager> install` inside `out_dir`.
///
/// When `package_manager` is `yarn` and it is not installed, `npm` is tried
/// instead. Any failure is recorded to [`install_log_path`] before being
/// returned.
pub fn install_dependencies(out_dir: &Path, package_manager: &str) -> Result<(), InstallError> {
	let result = run_install(out_dir, package_manager);

	if let Err(error) = &result {
		let log_path = install_log_path(out_dir);
		match write_install_log(&log_path, error) {
			Ok(()) => tracing::info!(path = %log_path.display(), "recorded install failure"),
			Err(log_error) => {
				tracing::warn!(
					path = %log_path.display(),
					error = %log_error,
					"failed to record install failure"
				);
			}
		}
	}

	result
}

fn run_install(out_dir: &Path, package_manager: &str) -> Result<(), InstallError> {
	tracing::info!(manager = package_manager, dir = %out_dir.display(), "installing dependencies");

	let (cmd, output) = match run_manager(out_dir, package_manager) {
		Ok(output) => (package_manager.to_owned(), output),
		Err(source) if source.kind() == std::io::ErrorKind::NotFound && package_manager == "yarn" => {
			tracing::warn!("yarn not found, falling back to npm");
			let output = run_manager(out_dir, "npm").map_err(|source| {
				InstallError::RunCommand {
					cmd: "npm".to_owned(),
					source,
				}
			})?;
			("npm".to_owned(), output)
		}
		Err(source) => {
			return Err(InstallError::RunCommand {
				cmd: package_manager.to_owned(),
				source,
			});
		}
	};

	if output.status.success() {
		return Ok(());
	}

	Err(InstallError::CommandFailed {
		cmd: format!("{cmd} install"),
		status: output.status.code().unwrap_or(-1),
		stdout: String::from_utf8_lossy(&output.stdout).trim().to_owned(),
		stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
	})
}

fn run_manager(out_dir: &Path, program: &str) -> std::io::Result<Output> {
	Command::new(program)
		.arg("install")
		.current_dir(out_dir)
		.output()
}

fn write_install_log(path: &Path, error: &InstallError) -> std::io::Result<()> {
	let mut log = format!("{error}\n");

	if let InstallError::CommandFailed { stdout, stderr, .. } = error {
		if !stdout.is_empty() {
			let _ = write!(log, "\n--- stdout ---\n{stdout}\n");
		}
		if !stderr.is_empty() {
			let _ = write!(log, "\n--- stderr ---\n{stderr}\n");
		}
	}

	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, log)
}
