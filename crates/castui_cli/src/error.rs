use std::path::PathBuf;

/// Coarse classification of every failure the pipeline can surface.
///
/// Callers use this to decide presentation and exit status without matching
/// on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	InvalidDescriptor,
	TemplateNotFound,
	InvalidTemplate,
	WriteFailed,
	InstallFailed,
}

/// Errors produced while loading and normalizing a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
	#[error("IO error at {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Descriptor is not valid JSON: {source}")]
	Json { source: serde_json::Error },

	#[error("Descriptor root must be a JSON object")]
	NotAnObject,

	#[error("Invalid IDL: missing instructions array")]
	MissingInstructions,

	#[error("Invalid IDL: `instructions` must be an array")]
	InstructionsNotAList,

	#[error("Invalid instruction at index {index}: {reason}")]
	InvalidInstruction { index: usize, reason: String },

	#[error("Type of `{context}` is nested deeper than {limit} levels")]
	TypeTooDeep { context: String, limit: usize },
}

impl DescriptorError {
	pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Self::Io {
			path: path.into(),
			source,
		}
	}

	pub fn kind(&self) -> ErrorKind {
		ErrorKind::InvalidDescriptor
	}
}

/// Errors produced while rendering the output tree.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("Template `{name}` not found in {root}. Available templates: {available}")]
	TemplateNotFound {
		name: String,
		root: PathBuf,
		available: String,
	},

	#[error("Template set `{template}` is missing `{file}`")]
	MissingTemplateFile { template: String, file: PathBuf },

	#[error("Failed to read template {path}: {source}")]
	ReadTemplate {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Failed to walk template directory {path}: {source}")]
	WalkTemplate {
		path: PathBuf,
		source: walkdir::Error,
	},

	#[error("Invalid template {path} (line {line}): {message}")]
	Template {
		path: PathBuf,
		line: usize,
		message: String,
	},

	#[error("Failed to create directory {path}: {source}")]
	CreateDir {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Failed to copy {from} to {to}: {source}")]
	CopyAsset {
		from: PathBuf,
		to: PathBuf,
		source: std::io::Error,
	},

	#[error("Failed to write {path}: {source}")]
	WriteFile {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("Instruction name `{name}` cannot be used as a file name")]
	InvalidFileName { name: String },

	#[error("Instruction `{name}` is declared more than once")]
	DuplicateInstruction { name: String },

	#[error("Failed to serialize `{context}`: {source}")]
	Serialize {
		context: String,
		source: serde_json::Error,
	},
}

impl RenderError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::TemplateNotFound { .. } | Self::MissingTemplateFile { .. } => {
				ErrorKind::TemplateNotFound
			}
			Self::ReadTemplate { .. } | Self::WalkTemplate { .. } | Self::Template { .. } => {
				ErrorKind::InvalidTemplate
			}
			Self::CreateDir { .. }
			| Self::CopyAsset { .. }
			| Self::WriteFile { .. }
			| Self::InvalidFileName { .. }
			| Self::DuplicateInstruction { .. }
			| Self::Serialize { .. } => ErrorKind::WriteFailed,
		}
	}
}

/// Errors produced by the optional dependency install step.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
	#[error("Failed to run `{cmd}`: {source}")]
	RunCommand { cmd: String, source: std::io::Error },

	#[error("`{cmd}` failed with status {status}")]
	CommandFailed {
		cmd: String,
		status: i32,
		stdout: String,
		stderr: String,
	},
}

impl InstallError {
	pub fn kind(&self) -> ErrorKind {
		ErrorKind::InstallFailed
	}
}

/// Errors produced by an end-to-end generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
	#[error("Failed to parse descriptor {path}: {source}")]
	Descriptor {
		path: PathBuf,
		source: DescriptorError,
	},

	#[error(transparent)]
	Render(#[from] RenderError),
}

impl GenerateError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Descriptor { source, .. } => source.kind(),
			Self::Render(source) => source.kind(),
		}
	}
}
