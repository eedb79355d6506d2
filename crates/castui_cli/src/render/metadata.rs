use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::error::RenderError;
use crate::network::Network;
use crate::render::write_file;

/// Hidden directory under the output root holding generation artifacts.
pub const METADATA_DIR: &str = ".castui";

pub const METADATA_FILE: &str = "metadata.json";

/// Audit record of a single generation run, persisted as the last step of
/// rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
	pub idl_path: String,
	pub program_name: String,
	pub program_id: String,
	pub template: String,
	pub network: Network,
	pub generated_at: String,
	pub version: String,
}

/// Path of the metadata file for `out_dir`.
pub fn metadata_path(out_dir: &Path) -> PathBuf {
	out_dir.join(METADATA_DIR).join(METADATA_FILE)
}

/// Write `metadata` as indented JSON, creating the metadata directory.
pub fn write_metadata(out_dir: &Path, metadata: &GenerationMetadata) -> Result<PathBuf, RenderError> {
	let mut json = serde_json::to_string_pretty(metadata).map_err(|source| {
		RenderError::Serialize {
			context: METADATA_FILE.to_owned(),
			source,
		}
	})?;
	json.push('\n');

	let path = metadata_path(out_dir);
	write_file(&path, &json)?;
	Ok(path)
}

/// Read back a metadata file written by [`write_metadata`].
pub fn read_metadata(out_dir: &Path) -> Option<GenerationMetadata> {
	let contents = std::fs::read_to_string(metadata_path(out_dir)).ok()?;
	serde_json::from_str(&contents).ok()
}
