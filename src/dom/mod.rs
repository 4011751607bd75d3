//! Arena-based DOM
//!
//! - Node: compact node records linked by NodeId indices
//! - Strings: interning pool for names, values, and text
//! - Document: the arena itself, parsing, traversal, and mutation
//! - Serialize: subtree to markup

pub mod document;
pub mod node;
pub mod serialize;
pub mod strings;

pub use document::{XmlDocument, DOCUMENT_NODE};
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
