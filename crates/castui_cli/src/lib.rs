//! Turn an Anchor or Codama program IDL into a scaffolded UI project.
//!
//! The pipeline runs in three strictly sequential stages:
//!
//! 1. [`parse`] normalizes the raw JSON descriptor into a canonical
//!    [`ir::Root`];
//! 2. [`mapper`] lowers it into the UI IR ([`ir::ui::InstructionIr`]),
//!    assigning a widget to every argument;
//! 3. [`render`] writes the output tree from a template set.
//!
//! [`generate()`] chains the three. [`install`] is the optional step a caller
//! may run afterwards.

pub mod error;
pub mod generate;
pub mod install;
pub mod ir;
pub mod logging;
pub mod mapper;
pub mod network;
pub mod parse;
pub mod render;

pub use crate::error::ErrorKind;
pub use crate::generate::GenerateOptions;
pub use crate::generate::GenerateOutcome;
pub use crate::generate::generate;
pub use crate::install::install_dependencies;
pub use crate::mapper::map_root;
pub use crate::network::Network;
pub use crate::parse::parse_descriptor_file;
pub use crate::render::Renderer;
