//! UI-facing projection of the canonical tree.
//!
//! These types are what templates see: the instruction page receives one
//! [`InstructionIr`] serialized as JSON.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Widget used to present and edit a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UiType {
	Text,
	Number,
	BigInt,
	Toggle,
	Address,
	List,
	Select,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgIr {
	pub name: String,
	pub ui_type: UiType,
	pub required: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	/// Recursively mapped fields of a struct or tuple argument. Empty for
	/// every other type.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<ArgIr>,
	/// Choices for a `Select` argument when the enum variants are known.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIr {
	pub name: String,
	pub is_signer: bool,
	pub is_writable: bool,
	pub optional: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub seeds: Option<Vec<Value>>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionIr {
	pub name: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub docs: Vec<String>,
	pub args: Vec<ArgIr>,
	pub accounts: Vec<AccountIr>,
}

/// Everything the renderer needs from the earlier stages.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderInput {
	pub instructions: Vec<InstructionIr>,
	pub program_name: String,
	pub program_id: String,
}
