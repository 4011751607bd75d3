//! XML node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document container (arena index 0)
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for the document container)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Index into string pool for name (elements, PIs) or content (text,
    /// CDATA, comment nodes)
    pub name_id: u32,
    /// Attributes (elements only)
    pub attributes: Vec<XmlAttribute>,
}

impl XmlNode {
    /// Create the document container node
    pub fn document() -> Self {
        XmlNode::with_kind(NodeKind::Document, None, 0)
    }

    /// Create a new element node
    pub fn element(name_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode::with_kind(NodeKind::Element, parent, name_id)
    }

    /// Create a new text node (content in name_id)
    pub fn text(content_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode::with_kind(NodeKind::Text, parent, content_id)
    }

    /// Create a new CDATA node (content in name_id)
    pub fn cdata(content_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode::with_kind(NodeKind::CData, parent, content_id)
    }

    /// Create a new comment node (content in name_id)
    pub fn comment(content_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode::with_kind(NodeKind::Comment, parent, content_id)
    }

    /// Create a processing instruction node
    pub fn processing_instruction(target_id: u32, parent: Option<NodeId>) -> Self {
        XmlNode::with_kind(NodeKind::ProcessingInstruction, parent, target_id)
    }

    /// Create an unlinked node of the given kind, for subtree copying
    pub(crate) fn bare(kind: NodeKind, name_id: u32) -> Self {
        XmlNode::with_kind(kind, None, name_id)
    }

    fn with_kind(kind: NodeKind, parent: Option<NodeId>, name_id: u32) -> Self {
        XmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            attributes: Vec::new(),
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text or CDATA node
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    /// Check if this node has children
    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// Stored attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Index into string pool for attribute name
    pub name_id: u32,
    /// Index into string pool for attribute value
    pub value_id: u32,
}

impl XmlAttribute {
    pub fn new(name_id: u32, value_id: u32) -> Self {
        XmlAttribute { name_id, value_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_node() {
        let doc = XmlNode::document();
        assert_eq!(doc.kind, NodeKind::Document);
        assert!(doc.parent.is_none());
        assert!(!doc.has_children());
    }

    #[test]
    fn test_element_node() {
        let elem = XmlNode::element(1, Some(0));
        assert_eq!(elem.kind, NodeKind::Element);
        assert_eq!(elem.parent, Some(0));
        assert_eq!(elem.name_id, 1);
        assert!(elem.is_element());
        assert!(!elem.is_text());
    }
}
