//! Lowering of the canonical [`Root`] into the UI intermediate
//! representation.

use crate::ir::AccountRef;
use crate::ir::ArgRef;
use crate::ir::Instruction;
use crate::ir::Root;
use crate::ir::TypeNode;
use crate::ir::ui::AccountIr;
use crate::ir::ui::ArgIr;
use crate::ir::ui::InstructionIr;
use crate::ir::ui::UiType;
use crate::parse::types::MAX_TYPE_DEPTH;

/// Name of the encoding-only argument that never reaches the UI.
pub const DISCRIMINATOR_ARG: &str = "discriminator";

/// Convert every instruction of `root` into an [`InstructionIr`], preserving
/// declaration order. An empty instruction list yields an empty IR.
pub fn map_root(root: &Root) -> Vec<InstructionIr> {
	let instructions: Vec<InstructionIr> = root
		.instructions
		.iter()
		.map(|instruction| map_instruction(root, instruction))
		.collect();

	tracing::debug!(
		program = %root.name,
		instructions = instructions.len(),
		"mapped descriptor to UI IR"
	);

	instructions
}

/// Convert a single instruction. `root` is used to resolve defined types.
pub fn map_instruction(root: &Root, instruction: &Instruction) -> InstructionIr {
	let args = instruction
		.args
		.iter()
		.filter(|arg| !arg.name.eq_ignore_ascii_case(DISCRIMINATOR_ARG))
		.map(|arg| map_argument(root, arg))
		.collect();

	let accounts = instruction.accounts.iter().map(map_account).collect();

	InstructionIr {
		name: instruction.name.clone(),
		docs: instruction.docs.clone(),
		args,
		accounts,
	}
}

/// Convert an argument or struct field, recursing into composites.
pub fn map_argument(root: &Root, arg: &ArgRef) -> ArgIr {
	map_typed(root, &arg.name, &arg.docs, arg.optional, &arg.ty)
}

fn map_typed(
	root: &Root,
	name: &str,
	docs: &[String],
	explicit_optional: bool,
	ty: &TypeNode,
) -> ArgIr {
	let optional = explicit_optional || matches!(ty, TypeNode::Option(_));

	ArgIr {
		name: name.to_owned(),
		ui_type: resolve_ui_type(ty),
		required: !optional,
		docs: docs.to_vec(),
		children: map_children(root, ty),
		options: select_options(root, ty),
	}
}

/// Resolve the widget for a type. Option wrappers are transparent here; the
/// optionality is reported through `required` instead.
pub fn resolve_ui_type(ty: &TypeNode) -> UiType {
	match ty {
		TypeNode::PublicKey => UiType::Address,
		TypeNode::Bool => UiType::Toggle,
		TypeNode::Integer { bits, .. } if *bits <= 32 => UiType::Number,
		TypeNode::Integer { .. } => UiType::BigInt,
		TypeNode::Float { .. } => UiType::Number,
		TypeNode::Option(inner) => resolve_ui_type(inner),
		TypeNode::List(_) | TypeNode::Bytes => UiType::List,
		TypeNode::Enum(_) | TypeNode::Defined(_) => UiType::Select,
		TypeNode::String | TypeNode::Struct(_) | TypeNode::Tuple(_) | TypeNode::Unknown(_) => {
			UiType::Text
		}
	}
}

fn map_children(root: &Root, ty: &TypeNode) -> Vec<ArgIr> {
	match ty.unwrap_options() {
		TypeNode::Struct(fields) => fields.iter().map(|field| map_argument(root, field)).collect(),
		TypeNode::Tuple(items) => {
			items
				.iter()
				.enumerate()
				.map(|(index, item)| map_typed(root, &index.to_string(), &[], false, item))
				.collect()
		}
		_ => Vec::new(),
	}
}

/// Variant names for `Select` arguments. Defined references are followed
/// through aliases, with a hop limit so cyclic aliases terminate.
fn select_options(root: &Root, ty: &TypeNode) -> Vec<String> {
	let mut current = ty.unwrap_options();

	for _ in 0..MAX_TYPE_DEPTH {
		match current {
			TypeNode::Enum(variants) => return variants.clone(),
			TypeNode::Defined(name) => {
				let Some(def) = root.find_type(name) else {
					return Vec::new();
				};
				current = def.ty.unwrap_options();
			}
			_ => return Vec::new(),
		}
	}

	Vec::new()
}

fn map_account(account: &AccountRef) -> AccountIr {
	AccountIr {
		name: account.name.clone(),
		is_signer: account.is_signer,
		is_writable: account.is_writable,
		optional: account.is_optional,
		role: account.role.clone(),
		seeds: account.seeds.clone(),
		docs: account.docs.clone(),
	}
}
