pub mod docs;
pub mod types;

use std::collections::HashSet;
use std::path::Path;

use serde_json::Map;
use serde_json::Value;

use crate::error::DescriptorError;
use crate::ir::AccountRef;
use crate::ir::ArgRef;
use crate::ir::ErrorDef;
use crate::ir::Instruction;
use crate::ir::Root;
use crate::ir::TypeDef;
use crate::ir::TypeNode;
use crate::parse::docs::extract_docs;
use crate::parse::types::explicit_optional;
use crate::parse::types::parse_type;

/// Program name used when the descriptor does not declare one.
pub const DEFAULT_PROGRAM_NAME: &str = "unknown_program";

/// Version used when the descriptor does not declare one.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Read a descriptor file and normalize it into a [`Root`].
pub fn parse_descriptor_file(path: &Path) -> Result<Root, DescriptorError> {
	let contents = std::fs::read_to_string(path).map_err(|e| DescriptorError::io(path, e))?;
	parse_descriptor_str(&contents)
}

/// Decode a descriptor from JSON text and normalize it into a [`Root`].
pub fn parse_descriptor_str(contents: &str) -> Result<Root, DescriptorError> {
	let document: Value =
		serde_json::from_str(contents).map_err(|source| DescriptorError::Json { source })?;
	parse_descriptor_value(&document)
}

/// Normalize an already decoded descriptor into a [`Root`].
///
/// The instruction list is looked up on the document itself, then on a
/// nested `program`, then on the first entry of `programs`. The first
/// non-empty list wins; when every list found is empty the first one is used.
pub fn parse_descriptor_value(document: &Value) -> Result<Root, DescriptorError> {
	let document = document.as_object().ok_or(DescriptorError::NotAnObject)?;
	let program = locate_program(document)?;

	let metadata = program
		.get("metadata")
		.and_then(Value::as_object)
		.cloned()
		.unwrap_or_default();

	let name = str_field(program, "name")
		.or_else(|| str_field(&metadata, "name"))
		.or_else(|| str_field(document, "name"))
		.unwrap_or(DEFAULT_PROGRAM_NAME)
		.to_owned();

	let version = str_field(program, "version")
		.or_else(|| str_field(&metadata, "version"))
		.unwrap_or(DEFAULT_VERSION)
		.to_owned();

	let address = str_field(&metadata, "address")
		.or_else(|| str_field(program, "address"))
		.or_else(|| str_field(program, "publicKey"))
		.map(str::to_owned);

	let instructions = array_field(program, "instructions")
		.iter()
		.enumerate()
		.map(|(index, value)| parse_instruction(index, value))
		.collect::<Result<Vec<_>, _>>()?;
	reject_duplicate_names(&instructions)?;

	let accounts = array_field(program, "accounts")
		.iter()
		.filter_map(|account| account.get("name").and_then(Value::as_str))
		.map(str::to_owned)
		.collect();

	let type_values = match program.get("types") {
		Some(Value::Array(types)) => types.as_slice(),
		_ => array_field(program, "definedTypes"),
	};
	let types = type_values
		.iter()
		.filter_map(Value::as_object)
		.filter_map(|def| Some((str_field(def, "name")?, def)))
		.map(|(name, def)| parse_type_def(name, def))
		.collect::<Result<Vec<_>, _>>()?;

	let errors = array_field(program, "errors")
		.iter()
		.filter_map(Value::as_object)
		.filter_map(parse_error_def)
		.collect();

	Ok(Root {
		name,
		version,
		metadata,
		address,
		instructions,
		accounts,
		types,
		errors,
	})
}

fn locate_program(document: &Map<String, Value>) -> Result<&Map<String, Value>, DescriptorError> {
	if document.get("instructions").is_some_and(|value| !value.is_array()) {
		return Err(DescriptorError::InstructionsNotAList);
	}

	let nested = document.get("program").and_then(Value::as_object);
	let listed = document
		.get("programs")
		.and_then(Value::as_array)
		.and_then(|programs| programs.first())
		.and_then(Value::as_object);

	let mut fallback = None;
	for candidate in [Some(document), nested, listed].into_iter().flatten() {
		let Some(instructions) = candidate.get("instructions").and_then(Value::as_array) else {
			continue;
		};
		if !instructions.is_empty() {
			return Ok(candidate);
		}
		fallback.get_or_insert(candidate);
	}

	fallback.ok_or(DescriptorError::MissingInstructions)
}

fn parse_instruction(index: usize, value: &Value) -> Result<Instruction, DescriptorError> {
	let Some(map) = value.as_object() else {
		return Err(DescriptorError::InvalidInstruction {
			index,
			reason: "expected an object".to_owned(),
		});
	};

	let name = match str_field(map, "name") {
		Some(name) if !name.trim().is_empty() => name.to_owned(),
		_ => {
			return Err(DescriptorError::InvalidInstruction {
				index,
				reason: "missing or empty `name`".to_owned(),
			});
		}
	};

	let raw_args = match map.get("args") {
		Some(Value::Array(args)) => args.as_slice(),
		_ => array_field(map, "arguments"),
	};
	let args = raw_args
		.iter()
		.map(|arg| parse_argument(&name, arg))
		.collect::<Result<Vec<_>, _>>()?;

	let mut accounts = Vec::new();
	flatten_accounts(array_field(map, "accounts"), &mut accounts);

	Ok(Instruction {
		docs: extract_docs(map.get("docs")),
		name,
		accounts,
		args,
	})
}

/// Each instruction renders to a file named after it, so names must be unique.
fn reject_duplicate_names(instructions: &[Instruction]) -> Result<(), DescriptorError> {
	let mut seen = HashSet::new();
	for (index, instruction) in instructions.iter().enumerate() {
		if !seen.insert(instruction.name.as_str()) {
			return Err(DescriptorError::InvalidInstruction {
				index,
				reason: format!("duplicate name `{}`", instruction.name),
			});
		}
	}
	Ok(())
}

fn parse_argument(instruction: &str, value: &Value) -> Result<ArgRef, DescriptorError> {
	let empty = Map::new();
	let map = value.as_object().unwrap_or(&empty);
	let name = str_field(map, "name").unwrap_or("unknown").to_owned();
	let context = format!("{instruction}.{name}");

	let ty = match map.get("type") {
		Some(ty) => parse_type(ty, &context)?,
		None => TypeNode::Unknown("missing type".to_owned()),
	};

	Ok(ArgRef {
		docs: extract_docs(map.get("docs")),
		optional: explicit_optional(map),
		name,
		ty,
	})
}

/// Anchor allows composite account groups (`{ name, accounts: [...] }`).
/// They are flattened in declaration order.
fn flatten_accounts(values: &[Value], out: &mut Vec<AccountRef>) {
	for value in values {
		let Some(map) = value.as_object() else {
			continue;
		};

		if let Some(Value::Array(group)) = map.get("accounts") {
			flatten_accounts(group, out);
			continue;
		}

		out.push(parse_account(map));
	}
}

fn parse_account(map: &Map<String, Value>) -> AccountRef {
	let is_signer = map
		.get("isSigner")
		.or_else(|| map.get("signer"))
		.is_some_and(|value| {
			// Codama marks accounts that may optionally sign as "either".
			value.as_bool() == Some(true) || value.as_str() == Some("either")
		});

	let seeds = map
		.get("seeds")
		.or_else(|| map.get("pda").and_then(|pda| pda.get("seeds")))
		.and_then(Value::as_array)
		.cloned();

	AccountRef {
		name: str_field(map, "name").unwrap_or("unknown").to_owned(),
		docs: extract_docs(map.get("docs")),
		is_signer,
		is_writable: flag(map, &["isMut", "isWritable", "writable"]),
		is_optional: flag(map, &["optional", "isOptional"]),
		role: str_field(map, "role").map(str::to_owned),
		seeds,
	}
}

fn parse_type_def(name: &str, def: &Map<String, Value>) -> Result<TypeDef, DescriptorError> {
	let ty = match def.get("type") {
		Some(ty) => parse_type(ty, name)?,
		None => TypeNode::Unknown("missing type".to_owned()),
	};

	Ok(TypeDef {
		name: name.to_owned(),
		docs: extract_docs(def.get("docs")),
		ty,
	})
}

fn parse_error_def(map: &Map<String, Value>) -> Option<ErrorDef> {
	let code = u32::try_from(map.get("code")?.as_u64()?).ok()?;
	Some(ErrorDef {
		code,
		name: str_field(map, "name")?.to_owned(),
		message: str_field(map, "msg")
			.or_else(|| str_field(map, "message"))
			.map(str::to_owned),
	})
}

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
	map.get(key).and_then(Value::as_str)
}

fn array_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
	map.get(key)
		.and_then(Value::as_array)
		.map_or(&[][..], Vec::as_slice)
}

fn flag(map: &Map<String, Value>, keys: &[&str]) -> bool {
	keys.iter()
		.any(|key| map.get(*key).and_then(Value::as_bool) == Some(true))
}
