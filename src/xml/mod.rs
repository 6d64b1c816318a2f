//! Order-preserving XML document model
//!
//! Documents are loaded into an owned tree and written back verbatim except
//! where the tree was changed.

pub mod document;
pub mod node;

pub use document::Document;
pub use node::{Element, Node, NodePath};
