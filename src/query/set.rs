//! Node sets
//!
//! A NodeSet is an ordered collection of node references into one document.
//! It is a value type: every query operation returns a new set, and two sets
//! compare equal iff they reference the same nodes in the same order. The
//! mutation operations (attribute setter, text setter) write through to the
//! referenced nodes and leave the set itself unchanged.

use crate::dom::{serialize, NodeId, XmlDocument, DOCUMENT_NODE};
use crate::error::QueryError;

/// Ordered, possibly-empty collection of node references
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSet {
    nodes: Vec<NodeId>,
}

impl NodeSet {
    /// Create a set from a list of node references
    pub fn new(nodes: Vec<NodeId>) -> Self {
        NodeSet { nodes }
    }

    /// Create a single-element set
    pub fn from_node(node: NodeId) -> Self {
        NodeSet { nodes: vec![node] }
    }

    /// The empty set
    pub fn empty() -> Self {
        NodeSet { nodes: Vec::new() }
    }

    /// Number of nodes in the set
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// True iff the set contains at least one node
    pub fn any(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// True iff the set contains no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the node references
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Get the node reference at a position
    pub fn get(&self, pos: usize) -> Option<NodeId> {
        self.nodes.get(pos).copied()
    }

    /// Single-element set holding the first member, or Empty
    pub fn first(&self) -> NodeSet {
        match self.nodes.first() {
            Some(&node) => NodeSet::from_node(node),
            None => NodeSet::empty(),
        }
    }

    /// Single-element set holding the last member, or Empty
    pub fn last(&self) -> NodeSet {
        match self.nodes.last() {
            Some(&node) => NodeSet::from_node(node),
            None => NodeSet::empty(),
        }
    }

    /// Single-element set holding the member at 0-based position `pos`.
    ///
    /// Out-of-range positions are an error; on an empty set no position is
    /// ever valid, so this always fails there.
    pub fn nth(&self, pos: i64) -> Result<NodeSet, QueryError> {
        if pos < 0 || pos as usize >= self.nodes.len() {
            return Err(QueryError::IndexOutOfRange {
                index: pos,
                len: self.nodes.len(),
            });
        }
        Ok(NodeSet::from_node(self.nodes[pos as usize]))
    }

    /// Position of the first member within its parent's child list.
    ///
    /// Returns -1 for an empty set, a parentless node, or a node whose
    /// parent is the document container.
    pub fn index(&self, doc: &XmlDocument) -> i64 {
        let Some(&node_id) = self.nodes.first() else {
            return -1;
        };
        let Some(parent_id) = doc.get_node(node_id).and_then(|n| n.parent) else {
            return -1;
        };
        if parent_id == DOCUMENT_NODE {
            return -1;
        }
        doc.children(parent_id)
            .position(|child| child == node_id)
            .map_or(-1, |pos| pos as i64)
    }

    /// Local name of the first member, or empty string
    pub fn name(&self, doc: &XmlDocument) -> String {
        let Some(&node_id) = self.nodes.first() else {
            return String::new();
        };
        local_name(doc.node_name(node_id).unwrap_or("")).to_string()
    }

    /// Backslash-joined chain of names from the topmost element down to the
    /// first member. The document container is excluded. Empty string for an
    /// empty set.
    pub fn path(&self, doc: &XmlDocument) -> String {
        let Some(&node_id) = self.nodes.first() else {
            return String::new();
        };
        let mut names = Vec::new();
        let mut current = node_id;
        while let Some(node) = doc.get_node(current) {
            let Some(parent_id) = node.parent else {
                break;
            };
            names.push(doc.node_name(current).unwrap_or("").to_string());
            current = parent_id;
        }
        names.reverse();
        names.join("\\")
    }

    /// Inner text of the first member, or empty string
    pub fn value(&self, doc: &XmlDocument) -> String {
        match self.nodes.first() {
            Some(&node_id) => doc.inner_text(node_id),
            None => String::new(),
        }
    }

    /// Set the text content of every member
    pub fn set_value(&self, doc: &mut XmlDocument, value: &str) {
        for &node_id in &self.nodes {
            doc.set_inner_text(node_id, value);
        }
    }

    /// Value of the named attribute on the first member, or empty string if
    /// the attribute is absent or the set is empty. The name is matched
    /// ASCII-case-insensitively; an empty name is an error.
    pub fn attr(&self, doc: &XmlDocument, name: &str) -> Result<String, QueryError> {
        if name.is_empty() {
            return Err(QueryError::InvalidArgument("attribute name".into()));
        }
        let value = self
            .nodes
            .first()
            .and_then(|&node_id| doc.get_attribute(node_id, name))
            .unwrap_or("");
        Ok(value.to_string())
    }

    /// Set the named attribute on every member. `None` removes the
    /// attribute instead of setting it to an empty string.
    pub fn set_attr(
        &self,
        doc: &mut XmlDocument,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), QueryError> {
        if name.is_empty() {
            return Err(QueryError::InvalidArgument("attribute name".into()));
        }
        for &node_id in &self.nodes {
            match value {
                Some(value) => doc.set_attribute(node_id, name, value),
                None => doc.remove_attribute(node_id, name),
            }
        }
        Ok(())
    }

    /// Element children of every member whose local name matches,
    /// case-insensitively
    pub fn child(&self, doc: &XmlDocument, name: &str) -> NodeSet {
        let mut nodes = Vec::new();
        for &node_id in &self.nodes {
            for child in doc.children(node_id) {
                let is_match = doc
                    .get_node(child)
                    .is_some_and(|n| n.is_element())
                    && doc
                        .node_name(child)
                        .is_some_and(|n| local_name(n).eq_ignore_ascii_case(name));
                if is_match {
                    nodes.push(child);
                }
            }
        }
        NodeSet::new(nodes)
    }

    /// Serialized inner XML of the first member, or empty string
    pub fn to_xml(&self, doc: &XmlDocument) -> String {
        match self.nodes.first() {
            Some(&node_id) => serialize::inner_xml(doc, node_id),
            None => String::new(),
        }
    }

    /// Detached deep copy of the first member as a fresh single-root
    /// document, or None for an empty set
    pub fn detach(&self, doc: &XmlDocument) -> Option<XmlDocument> {
        let &node_id = self.nodes.first()?;
        let mut copy = XmlDocument::new();
        doc.copy_subtree(node_id, &mut copy, DOCUMENT_NODE);
        Some(copy)
    }
}

impl From<Vec<NodeId>> for NodeSet {
    fn from(nodes: Vec<NodeId>) -> Self {
        NodeSet::new(nodes)
    }
}

/// Name after the last namespace-prefix colon
pub(crate) fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (XmlDocument, NodeSet) {
        let doc = XmlDocument::parse(
            b"<catalog><book id=\"b1\"><title>First</title></book>\
              <book id=\"b2\"><title>Second</title></book>\
              <book id=\"b3\"><title>Third</title></book></catalog>",
        )
        .unwrap();
        let catalog = doc.children(DOCUMENT_NODE).next().unwrap();
        let books: Vec<_> = doc.children(catalog).collect();
        (doc, NodeSet::new(books))
    }

    #[test]
    fn test_first_last_nth() {
        let (_, books) = sample();
        assert_eq!(books.count(), 3);
        assert_eq!(books.first().count(), 1);
        assert_eq!(books.last().count(), 1);
        assert_eq!(books.nth(0).unwrap(), books.first());
        assert_eq!(books.nth(2).unwrap(), books.last());
        assert_ne!(books.first(), books.last());
    }

    #[test]
    fn test_nth_out_of_range() {
        let (_, books) = sample();
        assert!(matches!(
            books.nth(-1),
            Err(QueryError::IndexOutOfRange { index: -1, len: 3 })
        ));
        assert!(books.nth(3).is_err());
    }

    #[test]
    fn test_nth_on_empty_always_fails() {
        assert!(NodeSet::empty().nth(0).is_err());
        assert!(NodeSet::empty().nth(-5).is_err());
    }

    #[test]
    fn test_empty_set_scalars() {
        let (doc, _) = sample();
        let empty = NodeSet::empty();
        assert_eq!(empty.count(), 0);
        assert!(!empty.any());
        assert!(empty.is_empty());
        assert_eq!(empty.index(&doc), -1);
        assert_eq!(empty.name(&doc), "");
        assert_eq!(empty.path(&doc), "");
        assert_eq!(empty.value(&doc), "");
    }

    #[test]
    fn test_index() {
        let (doc, books) = sample();
        assert_eq!(books.index(&doc), 0);
        assert_eq!(books.nth(1).unwrap().index(&doc), 1);
        assert_eq!(books.nth(2).unwrap().index(&doc), 2);
    }

    #[test]
    fn test_root_element_index_is_negative() {
        let (doc, _) = sample();
        let catalog = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(NodeSet::from_node(catalog).index(&doc), -1);
    }

    #[test]
    fn test_name_and_path() {
        let (doc, books) = sample();
        assert_eq!(books.name(&doc), "book");

        let titles = books.child(&doc, "title");
        assert_eq!(titles.count(), 3);
        assert_eq!(titles.path(&doc), "catalog\\book\\title");
    }

    #[test]
    fn test_value() {
        let (doc, books) = sample();
        let titles = books.child(&doc, "TITLE");
        assert_eq!(titles.value(&doc), "First");
    }

    #[test]
    fn test_set_value_mutates_all() {
        let (mut doc, books) = sample();
        let titles = books.child(&doc, "title");
        titles.set_value(&mut doc, "Renamed");
        for node in titles.iter() {
            assert_eq!(doc.inner_text(node), "Renamed");
        }
    }

    #[test]
    fn test_attr_round_trip() {
        let (mut doc, books) = sample();
        assert_eq!(books.attr(&doc, "id").unwrap(), "b1");
        assert_eq!(books.attr(&doc, "ID").unwrap(), "b1");
        assert_eq!(books.attr(&doc, "missing").unwrap(), "");

        books.set_attr(&mut doc, "lang", Some("en")).unwrap();
        for node in books.iter() {
            assert_eq!(doc.get_attribute(node, "lang"), Some("en"));
        }

        books.set_attr(&mut doc, "lang", None).unwrap();
        for node in books.iter() {
            assert_eq!(doc.get_attribute(node, "lang"), None);
        }
    }

    #[test]
    fn test_attr_empty_name_is_invalid() {
        let (mut doc, books) = sample();
        assert!(matches!(
            books.attr(&doc, ""),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(books.set_attr(&mut doc, "", Some("x")).is_err());
    }

    #[test]
    fn test_to_xml() {
        let (doc, books) = sample();
        assert_eq!(books.first().to_xml(&doc), "<title>First</title>");
        assert_eq!(NodeSet::empty().to_xml(&doc), "");
    }

    #[test]
    fn test_detach() {
        let (doc, books) = sample();
        let copy = books.first().detach(&doc).unwrap();
        let root = copy.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(copy.node_name(root), Some("book"));
        assert_eq!(copy.get_attribute(root, "id"), Some("b1"));
        assert!(NodeSet::empty().detach(&doc).is_none());
    }
}
