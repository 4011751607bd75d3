//! Arena-based XML document
//!
//! DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - String interning for names, attribute values, and text content
//!
//! Parsing is strict: tag mismatches, multiple root elements, stray text at
//! document level, and unclosed tags are all errors. Whitespace-only text
//! between tags is not materialized as nodes.

use super::node::{NodeId, XmlAttribute, XmlNode};
use super::strings::StringPool;
use crate::error::QueryError;
use crate::reader::events::XmlEvent;
use crate::reader::slice::SliceReader;

/// The document container's arena index
pub const DOCUMENT_NODE: NodeId = 0;

/// An XML document stored in arena format
#[derive(Debug)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    /// Interned strings
    pub strings: StringPool,
}

impl XmlDocument {
    /// Create an empty document holding only the container node
    pub fn new() -> Self {
        let mut doc = XmlDocument {
            nodes: Vec::with_capacity(256),
            strings: StringPool::new(),
        };
        doc.nodes.push(XmlNode::document());
        doc
    }

    /// Parse an XML document from a byte slice
    pub fn parse(input: &[u8]) -> Result<Self, QueryError> {
        let mut doc = XmlDocument::new();
        doc.build_from_events(input)?;
        Ok(doc)
    }

    /// Build the DOM from parser events
    fn build_from_events(&mut self, input: &[u8]) -> Result<(), QueryError> {
        let mut reader = SliceReader::new(input);
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];
        let mut tag_stack: Vec<Vec<u8>> = Vec::new();
        let mut root_seen = false;

        loop {
            match reader.next_event()? {
                XmlEvent::StartElement(elem) => {
                    if stack.len() == 1 {
                        if root_seen {
                            return Err(QueryError::Parse(
                                "document has multiple root elements".into(),
                            ));
                        }
                        root_seen = true;
                    }
                    tag_stack.push(elem.name.to_vec());
                    let node_id = self.append_parsed_element(&elem, &stack);
                    stack.push(node_id);
                }

                XmlEvent::EmptyElement(elem) => {
                    if stack.len() == 1 {
                        if root_seen {
                            return Err(QueryError::Parse(
                                "document has multiple root elements".into(),
                            ));
                        }
                        root_seen = true;
                    }
                    self.append_parsed_element(&elem, &stack);
                }

                XmlEvent::EndElement { name } => {
                    match tag_stack.pop() {
                        Some(open) if open == name => {}
                        Some(open) => {
                            return Err(QueryError::Parse(format!(
                                "tag mismatch: <{}> closed with </{}>",
                                String::from_utf8_lossy(&open),
                                String::from_utf8_lossy(name)
                            )));
                        }
                        None => {
                            return Err(QueryError::Parse(format!(
                                "closing tag </{}> without matching start tag",
                                String::from_utf8_lossy(name)
                            )));
                        }
                    }
                    stack.pop();
                }

                XmlEvent::Text(content) => {
                    let is_whitespace = content.iter().all(|b| b.is_ascii_whitespace());
                    if is_whitespace {
                        continue;
                    }
                    if stack.len() == 1 {
                        return Err(QueryError::Parse(
                            "text content not allowed at document level".into(),
                        ));
                    }
                    let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
                    let content_id = self.strings.intern(content.as_ref());
                    self.append_node(XmlNode::text(content_id, Some(parent_id)), parent_id);
                }

                XmlEvent::CData(content) => {
                    if stack.len() == 1 {
                        return Err(QueryError::Parse(
                            "CDATA section not allowed at document level".into(),
                        ));
                    }
                    let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
                    let content_id = self.strings.intern(content);
                    self.append_node(XmlNode::cdata(content_id, Some(parent_id)), parent_id);
                }

                XmlEvent::Comment(content) => {
                    let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
                    let content_id = self.strings.intern(content);
                    self.append_node(XmlNode::comment(content_id, Some(parent_id)), parent_id);
                }

                XmlEvent::ProcessingInstruction { target } => {
                    let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
                    let target_id = self.strings.intern(target);
                    self.append_node(
                        XmlNode::processing_instruction(target_id, Some(parent_id)),
                        parent_id,
                    );
                }

                XmlEvent::DocType(_) => {}

                XmlEvent::EndDocument => break,
            }
        }

        if let Some(open) = tag_stack.first() {
            return Err(QueryError::Parse(format!(
                "unclosed tag <{}>",
                String::from_utf8_lossy(open)
            )));
        }
        if !root_seen {
            return Err(QueryError::Parse("document has no root element".into()));
        }

        Ok(())
    }

    fn append_parsed_element(
        &mut self,
        elem: &crate::reader::events::StartElement<'_>,
        stack: &[NodeId],
    ) -> NodeId {
        let parent_id = *stack.last().unwrap_or(&DOCUMENT_NODE);
        let name_id = self.strings.intern(elem.name);
        let mut node = XmlNode::element(name_id, Some(parent_id));
        node.attributes = elem
            .attributes
            .iter()
            .map(|attr| {
                let name_id = self.strings.intern(attr.name);
                let value_id = self.strings.intern(attr.value.as_ref());
                XmlAttribute::new(name_id, value_id)
            })
            .collect();
        self.append_node(node, parent_id)
    }

    /// Add a node to the arena and link it as the parent's last child
    fn append_node(&mut self, node: XmlNode, parent_id: NodeId) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }

    /// Unlink all children of a node. The detached nodes stay in the arena
    /// but become unreachable.
    fn unlink_children(&mut self, parent_id: NodeId) {
        let mut child = self.nodes[parent_id as usize].first_child;
        while let Some(id) = child {
            let node = &mut self.nodes[id as usize];
            child = node.next_sibling;
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
        let parent = &mut self.nodes[parent_id as usize];
        parent.first_child = None;
        parent.last_child = None;
    }

    /// Get a node by ID
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    /// Get node name (elements, PIs) or content (text, CDATA, comments)
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        self.strings.get_str(node.name_id)
    }

    /// Get text content of a text or CDATA node
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        if node.is_text() {
            self.strings.get_str(node.name_id)
        } else {
            None
        }
    }

    /// Get attribute value by name. Attribute names compare
    /// ASCII-case-insensitively.
    pub fn get_attribute(&self, node_id: NodeId, name: &str) -> Option<&str> {
        let node = self.get_node(node_id)?;
        for attr in &node.attributes {
            if let Some(attr_name) = self.strings.get_str(attr.name_id) {
                if attr_name.eq_ignore_ascii_case(name) {
                    return self.strings.get_str(attr.value_id);
                }
            }
        }
        None
    }

    /// Set an attribute, replacing an existing value under the same name
    pub fn set_attribute(&mut self, node_id: NodeId, name: &str, value: &str) {
        let value_id = self.strings.intern(value.as_bytes());
        let existing = self.nodes.get(node_id as usize).and_then(|node| {
            node.attributes.iter().position(|attr| {
                self.strings
                    .get_str(attr.name_id)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
        });
        match existing {
            Some(pos) => self.nodes[node_id as usize].attributes[pos].value_id = value_id,
            None => {
                let name_id = self.strings.intern(name.as_bytes());
                if let Some(node) = self.nodes.get_mut(node_id as usize) {
                    node.attributes.push(XmlAttribute::new(name_id, value_id));
                }
            }
        }
    }

    /// Remove an attribute by name. Removing an absent attribute is a no-op.
    pub fn remove_attribute(&mut self, node_id: NodeId, name: &str) {
        let Some(node) = self.nodes.get(node_id as usize) else {
            return;
        };
        let pos = node.attributes.iter().position(|attr| {
            self.strings
                .get_str(attr.name_id)
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        });
        if let Some(pos) = pos {
            self.nodes[node_id as usize].attributes.remove(pos);
        }
    }

    /// Get the concatenated text of all descendant text nodes, in
    /// document order
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.get_node(id) {
            if node.is_text() {
                if let Some(text) = self.strings.get_str(node.name_id) {
                    out.push_str(text);
                }
                return out;
            }
        }
        for desc in self.descendants(id) {
            if let Some(text) = self.text_content(desc) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace a node's children with a single text node. An empty string
    /// leaves the node with no children.
    pub fn set_inner_text(&mut self, id: NodeId, text: &str) {
        self.unlink_children(id);
        if !text.is_empty() {
            let content_id = self.strings.intern(text.as_bytes());
            self.append_node(XmlNode::text(content_id, Some(id)), id);
        }
    }

    /// Deep-copy the subtree rooted at `src` into `dst`, appending it under
    /// `dst_parent`. Returns the ID of the copy's root in `dst`.
    pub fn copy_subtree(&self, src: NodeId, dst: &mut XmlDocument, dst_parent: NodeId) -> NodeId {
        let src_node = &self.nodes[src as usize];
        let name_id = dst
            .strings
            .intern(self.strings.get(src_node.name_id).unwrap_or(b""));

        let mut copy = XmlNode::bare(src_node.kind, name_id);
        copy.parent = Some(dst_parent);
        copy.attributes = src_node
            .attributes
            .iter()
            .map(|attr| {
                XmlAttribute::new(
                    dst.strings.intern(self.strings.get(attr.name_id).unwrap_or(b"")),
                    dst.strings
                        .intern(self.strings.get(attr.value_id).unwrap_or(b"")),
                )
            })
            .collect();

        let copy_id = dst.append_node(copy, dst_parent);
        for child in self.children(src) {
            self.copy_subtree(child, dst, copy_id);
        }
        copy_id
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            next: first,
        }
    }

    /// Iterate over all descendants of a node, depth-first pre-order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack = Vec::new();
        if let Some(node) = self.get_node(id) {
            let mut child_id = node.last_child;
            while let Some(cid) = child_id {
                stack.push(cid);
                child_id = self.get_node(cid).and_then(|n| n.prev_sibling);
            }
        }
        DescendantIter { doc: self, stack }
    }

    /// Get total number of arena slots (including unlinked nodes)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        XmlDocument::new()
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d> {
    doc: &'d XmlDocument,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendant nodes (depth-first pre-order)
pub struct DescendantIter<'d> {
    doc: &'d XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        if let Some(node) = self.doc.get_node(current) {
            let mut child_id = node.last_child;
            while let Some(id) = child_id {
                self.stack.push(id);
                child_id = self.doc.get_node(id).and_then(|n| n.prev_sibling);
            }
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = XmlDocument::parse(b"<root>hello</root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.node_name(root), Some("root"));
        assert_eq!(doc.inner_text(root), "hello");
    }

    #[test]
    fn test_parse_nested() {
        let doc = XmlDocument::parse(b"<a><b><c/></b></a>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_name(children[0]), Some("b"));
    }

    #[test]
    fn test_descendants() {
        let doc = XmlDocument::parse(b"<root><a/><b><c/></b></root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        let names: Vec<_> = doc
            .descendants(root)
            .filter_map(|id| doc.node_name(id))
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_whitespace_text_not_materialized() {
        let doc = XmlDocument::parse(b"<root>\n  <a/>\n  <b/>\n</root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.children(root).count(), 2);
    }

    #[test]
    fn test_sibling_links() {
        let doc = XmlDocument::parse(b"<root><a/><b/><c/></root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        let children: Vec<_> = doc.children(root).collect();
        assert_eq!(children.len(), 3);

        let first = doc.get_node(children[0]).unwrap();
        assert!(first.prev_sibling.is_none());
        assert_eq!(first.next_sibling, Some(children[1]));
    }

    #[test]
    fn test_attributes() {
        let doc = XmlDocument::parse(b"<root id=\"r1\" lang=\"en\"/>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(doc.get_attribute(root, "id"), Some("r1"));
        assert_eq!(doc.get_attribute(root, "ID"), Some("r1"));
        assert_eq!(doc.get_attribute(root, "missing"), None);
    }

    #[test]
    fn test_set_and_remove_attribute() {
        let mut doc = XmlDocument::parse(b"<root id=\"r1\"/>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();

        doc.set_attribute(root, "id", "r2");
        assert_eq!(doc.get_attribute(root, "id"), Some("r2"));

        doc.set_attribute(root, "lang", "en");
        assert_eq!(doc.get_attribute(root, "lang"), Some("en"));

        doc.remove_attribute(root, "id");
        assert_eq!(doc.get_attribute(root, "id"), None);
        doc.remove_attribute(root, "id");
    }

    #[test]
    fn test_set_inner_text() {
        let mut doc = XmlDocument::parse(b"<root><a>old</a></root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        let a = doc.children(root).next().unwrap();

        doc.set_inner_text(a, "new");
        assert_eq!(doc.inner_text(a), "new");
        assert_eq!(doc.children(a).count(), 1);

        doc.set_inner_text(a, "");
        assert_eq!(doc.children(a).count(), 0);
    }

    #[test]
    fn test_copy_subtree() {
        let src = XmlDocument::parse(b"<root><a id=\"x\">text</a></root>").unwrap();
        let root = src.children(DOCUMENT_NODE).next().unwrap();
        let a = src.children(root).next().unwrap();

        let mut dst = XmlDocument::new();
        let copy = src.copy_subtree(a, &mut dst, DOCUMENT_NODE);
        assert_eq!(dst.node_name(copy), Some("a"));
        assert_eq!(dst.get_attribute(copy, "id"), Some("x"));
        assert_eq!(dst.inner_text(copy), "text");
    }

    #[test]
    fn test_tag_mismatch_is_error() {
        assert!(XmlDocument::parse(b"<a><b></a></b>").is_err());
    }

    #[test]
    fn test_multiple_roots_is_error() {
        assert!(XmlDocument::parse(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_unclosed_tag_is_error() {
        assert!(XmlDocument::parse(b"<a><b>").is_err());
    }

    #[test]
    fn test_document_level_text_is_error() {
        assert!(XmlDocument::parse(b"<a/>stray").is_err());
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(XmlDocument::parse(b"").is_err());
    }
}
