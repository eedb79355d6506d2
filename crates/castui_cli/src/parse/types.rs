use serde_json::Map;
use serde_json::Value;

use crate::error::DescriptorError;
use crate::ir::ArgRef;
use crate::ir::TypeNode;
use crate::parse::docs::extract_docs;

/// Maximum nesting of type nodes accepted from a descriptor.
pub const MAX_TYPE_DEPTH: usize = 32;

/// Convert a raw descriptor type (Anchor string/object form or a Codama type
/// node) into a [`TypeNode`].
///
/// `context` names the argument or type being converted and is only used in
/// error messages. Unrecognized shapes become [`TypeNode::Unknown`].
pub fn parse_type(value: &Value, context: &str) -> Result<TypeNode, DescriptorError> {
	parse_type_at(value, context, 0)
}

/// Convert a list of struct fields. Entries with a `name` and a `type` become
/// named fields; bare types become positional fields named by their index.
pub fn parse_fields(fields: &[Value], context: &str) -> Result<Vec<ArgRef>, DescriptorError> {
	parse_fields_at(fields, context, 0)
}

/// Map an Anchor scalar name (`u64`, `bool`, `publicKey`, ...) to a
/// [`TypeNode`].
pub fn scalar_type(name: &str) -> TypeNode {
	match name {
		"bool" => TypeNode::Bool,
		"string" => TypeNode::String,
		"publicKey" | "pubkey" => TypeNode::PublicKey,
		"bytes" => TypeNode::Bytes,
		"f32" => TypeNode::Float { bits: 32 },
		"f64" => TypeNode::Float { bits: 64 },
		"shortU16" => {
			TypeNode::Integer {
				bits: 16,
				signed: false,
			}
		}
		_ => integer_type(name).unwrap_or_else(|| TypeNode::Unknown(name.to_owned())),
	}
}

fn integer_type(name: &str) -> Option<TypeNode> {
	let (signed, digits) = if let Some(rest) = name.strip_prefix('u') {
		(false, rest)
	} else if let Some(rest) = name.strip_prefix('i') {
		(true, rest)
	} else {
		return None;
	};

	let bits: u16 = digits.parse().ok()?;
	matches!(bits, 8 | 16 | 32 | 64 | 128 | 256).then_some(TypeNode::Integer { bits, signed })
}

fn parse_type_at(value: &Value, context: &str, depth: usize) -> Result<TypeNode, DescriptorError> {
	if depth > MAX_TYPE_DEPTH {
		return Err(DescriptorError::TypeTooDeep {
			context: context.to_owned(),
			limit: MAX_TYPE_DEPTH,
		});
	}

	match value {
		Value::String(name) => Ok(scalar_type(name)),
		Value::Object(map) => {
			match map.get("kind").and_then(Value::as_str) {
				Some(kind) => kind_type(kind, map, context, depth),
				None => anchor_object_type(map, context, depth),
			}
		}
		Value::Null => Ok(TypeNode::Unknown("null".to_owned())),
		other => Ok(TypeNode::Unknown(other.to_string())),
	}
}

/// Anchor object types: `{ "option": T }`, `{ "vec": T }`, `{ "array": [T, N] }`,
/// `{ "defined": ... }` and friends.
fn anchor_object_type(
	map: &Map<String, Value>,
	context: &str,
	depth: usize,
) -> Result<TypeNode, DescriptorError> {
	let next = depth + 1;

	if let Some(inner) = map.get("option").or_else(|| map.get("coption")) {
		return Ok(TypeNode::Option(Box::new(parse_type_at(
			inner, context, next,
		)?)));
	}

	if let Some(inner) = map
		.get("vec")
		.or_else(|| map.get("hashSet"))
		.or_else(|| map.get("bTreeSet"))
	{
		return Ok(TypeNode::List(Box::new(parse_type_at(inner, context, next)?)));
	}

	if let Some(array) = map.get("array") {
		let item = match array {
			Value::Array(parts) => parts.first(),
			other => Some(other),
		};
		let item = match item {
			Some(item) => parse_type_at(item, context, next)?,
			None => TypeNode::Unknown("array".to_owned()),
		};
		return Ok(TypeNode::List(Box::new(item)));
	}

	if let Some(defined) = map.get("defined") {
		return Ok(defined_reference(defined));
	}

	if let Some(inner) = map.get("struct") {
		let fields = inner
			.get("fields")
			.and_then(Value::as_array)
			.map_or(&[][..], Vec::as_slice);
		return Ok(TypeNode::Struct(parse_fields_at(fields, context, next)?));
	}

	if let Some(Value::Array(items)) = map.get("tuple") {
		return parse_tuple(items, context, next);
	}

	if map.get("name").and_then(Value::as_str) == Some("publicKey") {
		return Ok(TypeNode::PublicKey);
	}

	Ok(TypeNode::Unknown(describe_object(map)))
}

/// Objects carrying a `kind` tag: Codama type nodes plus the Anchor type
/// definition forms `{ "kind": "struct" }` and `{ "kind": "enum" }`.
fn kind_type(
	kind: &str,
	map: &Map<String, Value>,
	context: &str,
	depth: usize,
) -> Result<TypeNode, DescriptorError> {
	let next = depth + 1;

	let node = match kind {
		"numberTypeNode" => {
			map.get("format")
				.and_then(Value::as_str)
				.map_or_else(|| TypeNode::Unknown(kind.to_owned()), scalar_type)
		}
		"booleanTypeNode" => TypeNode::Bool,
		"stringTypeNode" => TypeNode::String,
		"publicKeyTypeNode" => TypeNode::PublicKey,
		"bytesTypeNode" => TypeNode::Bytes,
		"optionTypeNode" | "zeroableOptionTypeNode" | "remainderOptionTypeNode" => {
			TypeNode::Option(Box::new(child_type(map, "item", context, next)?))
		}
		"arrayTypeNode" | "setTypeNode" => {
			TypeNode::List(Box::new(child_type(map, "item", context, next)?))
		}
		"structTypeNode" | "struct" => {
			let fields = map
				.get("fields")
				.and_then(Value::as_array)
				.map_or(&[][..], Vec::as_slice);
			TypeNode::Struct(parse_fields_at(fields, context, next)?)
		}
		"tupleTypeNode" => {
			let items = map
				.get("items")
				.and_then(Value::as_array)
				.map_or(&[][..], Vec::as_slice);
			parse_tuple(items, context, next)?
		}
		"enumTypeNode" | "enum" => {
			let variants = map
				.get("variants")
				.and_then(Value::as_array)
				.map_or(&[][..], Vec::as_slice);
			TypeNode::Enum(variant_names(variants))
		}
		"definedTypeLinkNode" => defined_reference(map.get("name").unwrap_or(&Value::Null)),
		"sizePrefixTypeNode" | "fixedSizeTypeNode" | "hiddenPrefixTypeNode"
		| "hiddenSuffixTypeNode" | "preOffsetTypeNode" | "postOffsetTypeNode" => {
			child_type(map, "type", context, next)?
		}
		other => TypeNode::Unknown(other.to_owned()),
	};

	Ok(node)
}

fn child_type(
	map: &Map<String, Value>,
	key: &str,
	context: &str,
	depth: usize,
) -> Result<TypeNode, DescriptorError> {
	match map.get(key) {
		Some(value) => parse_type_at(value, context, depth),
		None => Ok(TypeNode::Unknown(format!("missing `{key}`"))),
	}
}

fn parse_tuple(items: &[Value], context: &str, depth: usize) -> Result<TypeNode, DescriptorError> {
	let items = items
		.iter()
		.map(|item| parse_type_at(item, context, depth))
		.collect::<Result<Vec<_>, _>>()?;
	Ok(TypeNode::Tuple(items))
}

fn parse_fields_at(
	fields: &[Value],
	context: &str,
	depth: usize,
) -> Result<Vec<ArgRef>, DescriptorError> {
	fields
		.iter()
		.enumerate()
		.map(|(index, field)| {
			let named = field
				.as_object()
				.and_then(|map| Some((map.get("name")?.as_str()?, map.get("type")?, map)));

			match named {
				Some((name, ty, map)) => {
					let field_context = format!("{context}.{name}");
					Ok(ArgRef {
						name: name.to_owned(),
						docs: extract_docs(map.get("docs")),
						optional: explicit_optional(map),
						ty: parse_type_at(ty, &field_context, depth)?,
					})
				}
				None => {
					Ok(ArgRef {
						name: index.to_string(),
						docs: Vec::new(),
						optional: false,
						ty: parse_type_at(field, context, depth)?,
					})
				}
			}
		})
		.collect()
}

/// `defined` may be a bare name (Anchor < 0.30) or `{ "name": ... }`.
fn defined_reference(value: &Value) -> TypeNode {
	let name = match value {
		Value::String(name) => Some(name.as_str()),
		Value::Object(map) => map.get("name").and_then(Value::as_str),
		_ => None,
	};

	match name {
		Some(name) => TypeNode::Defined(name.to_owned()),
		None => TypeNode::Unknown("defined".to_owned()),
	}
}

fn variant_names(variants: &[Value]) -> Vec<String> {
	variants
		.iter()
		.enumerate()
		.map(|(index, variant)| {
			match variant {
				Value::String(name) => name.clone(),
				Value::Object(map) => {
					map.get("name")
						.and_then(Value::as_str)
						.map_or_else(|| index.to_string(), str::to_owned)
				}
				_ => index.to_string(),
			}
		})
		.collect()
}

/// Explicit optional flag shared by arguments and fields.
pub(crate) fn explicit_optional(map: &Map<String, Value>) -> bool {
	["isOptional", "optional"]
		.iter()
		.any(|key| map.get(*key).and_then(Value::as_bool) == Some(true))
}

fn describe_object(map: &Map<String, Value>) -> String {
	let keys = map.keys().map(String::as_str).collect::<Vec<_>>();
	format!("{{{}}}", keys.join(", "))
}
