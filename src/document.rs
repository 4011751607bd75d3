//! Document handle
//!
//! Wraps a parsed tree and anchors queries at the root element. The root
//! set is the *last* child of the document container, which skips any
//! preamble nodes (comments, processing instructions) the container holds
//! ahead of the root element.

use crate::dom::{XmlDocument, DOCUMENT_NODE};
use crate::error::QueryError;
use crate::query::{dispatch, NodeSet, Selector, Value};
use std::path::Path;

/// A loaded document and the entry point for queries against it
#[derive(Debug)]
pub struct Document {
    dom: XmlDocument,
}

impl Document {
    /// Load a document from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Document, QueryError> {
        let bytes = std::fs::read(path).map_err(|e| QueryError::Io(e.to_string()))?;
        Document::from_bytes(&bytes)
    }

    /// Parse a document from a string
    pub fn from_xml(xml: &str) -> Result<Document, QueryError> {
        Document::from_bytes(xml.as_bytes())
    }

    /// Parse a document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Document, QueryError> {
        Ok(Document {
            dom: XmlDocument::parse(bytes)?,
        })
    }

    /// The underlying tree
    pub fn dom(&self) -> &XmlDocument {
        &self.dom
    }

    /// The underlying tree, mutable
    pub fn dom_mut(&mut self) -> &mut XmlDocument {
        &mut self.dom
    }

    /// The root set: the last child of the document container
    pub fn root(&self) -> NodeSet {
        match self.dom.get_node(DOCUMENT_NODE).and_then(|n| n.last_child) {
            Some(root) => NodeSet::from_node(root),
            None => NodeSet::empty(),
        }
    }

    /// Name-based lookup on the root set itself: returns the root set if
    /// the root's local name matches case-insensitively, Empty otherwise
    pub fn child(&self, name: &str) -> NodeSet {
        let root = self.root();
        let matches = root.any() && root.name(&self.dom).eq_ignore_ascii_case(name);
        if matches {
            root
        } else {
            NodeSet::empty()
        }
    }

    /// Selector search over the root element's subtree
    pub fn select(&self, selector: &str) -> NodeSet {
        if selector.trim().is_empty() {
            return NodeSet::empty();
        }
        Selector::compile_cached(selector).find(&self.dom, &self.root())
    }

    /// Dispatch an operation against the root set
    pub fn invoke(
        &mut self,
        name: &str,
        args: Vec<dispatch::Arg<'_>>,
    ) -> Result<Value, QueryError> {
        let root = self.root();
        dispatch::invoke(&mut self.dom, &root, name, args)
    }
}
