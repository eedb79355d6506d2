//! Canonical representation of a program descriptor.
//!
//! The canonical tree is built by [`crate::parse`] from raw Anchor or Codama
//! JSON and only guarantees shape: every container exists and every type is
//! one of the closed [`TypeNode`] kinds. UI concerns live in [`ui`].

pub mod ui;

use serde_json::Map;
use serde_json::Value;

/// Top-level canonical form of a single program descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
	pub name: String,
	pub version: String,
	pub metadata: Map<String, Value>,
	/// Program identifier taken from the descriptor, when it declares one.
	pub address: Option<String>,
	pub instructions: Vec<Instruction>,
	/// Names of the account types the program declares.
	pub accounts: Vec<String>,
	pub types: Vec<TypeDef>,
	pub errors: Vec<ErrorDef>,
}

impl Root {
	/// Look up a defined type by name.
	pub fn find_type(&self, name: &str) -> Option<&TypeDef> {
		self.types.iter().find(|def| def.name == name)
	}
}

/// A callable instruction with its accounts and arguments in declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
	pub name: String,
	pub docs: Vec<String>,
	pub accounts: Vec<AccountRef>,
	pub args: Vec<ArgRef>,
}

/// A single account slot of an instruction. Nested account groups are
/// flattened by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRef {
	pub name: String,
	pub docs: Vec<String>,
	pub is_signer: bool,
	pub is_writable: bool,
	pub is_optional: bool,
	pub role: Option<String>,
	pub seeds: Option<Vec<Value>>,
}

/// A named, typed value. Used for instruction arguments and struct fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgRef {
	pub name: String,
	pub docs: Vec<String>,
	/// Explicit optional flag from the descriptor. Option-wrapped types are
	/// optional regardless of this flag.
	pub optional: bool,
	pub ty: TypeNode,
}

/// The closed set of type shapes every descriptor vocabulary is normalized
/// into.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
	Integer { bits: u16, signed: bool },
	Float { bits: u16 },
	Bool,
	String,
	PublicKey,
	Bytes,
	Option(Box<TypeNode>),
	/// Vectors, fixed arrays and sets.
	List(Box<TypeNode>),
	Struct(Vec<ArgRef>),
	Tuple(Vec<TypeNode>),
	/// Inline enum with its variant names.
	Enum(Vec<String>),
	/// Reference to a type declared in [`Root::types`].
	Defined(String),
	/// Anything the parser does not recognize, with a short description.
	Unknown(String),
}

impl TypeNode {
	/// Strip any number of option wrappers.
	pub fn unwrap_options(&self) -> &Self {
		let mut current = self;
		while let Self::Option(inner) = current {
			current = inner;
		}
		current
	}
}

/// A type declared at program level and referenced by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
	pub name: String,
	pub docs: Vec<String>,
	pub ty: TypeNode,
}

/// A program error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDef {
	pub code: u32,
	pub name: String,
	pub message: Option<String>,
}
