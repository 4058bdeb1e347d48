//! Crate for holding deobfuscation mappings in memory, fusing two mapping sets together, and writing them out.
//!
//! The mappings are stored as a [`MappingsContainer`][tree::mappings::MappingsContainer], where every class, method and
//! field carries up to three names: the obfuscated one (always there), the intermediary one and the mapped one.
//!
//! Reading is supported for the Tiny v1 and Tiny v2 formats (see [`tiny_v1`] and [`tiny_v2`]), writing only for
//! Tiny v1 with exactly two columns (see [`tiny_v1::export`]).
//!
//! Two containers of the same version can be fused with [`rewire`][fn@rewire::rewire].

mod lines;

pub mod error;
pub mod tree;
pub mod rewire;

pub mod tiny_v1;
pub mod tiny_v2;

pub use error::{Error, Result};
