//! XML serialization
//!
//! Turns a subtree back into markup. Text and attribute values are
//! re-escaped; CDATA sections are emitted verbatim. No indentation or
//! whitespace is introduced.

use super::document::XmlDocument;
use super::node::{NodeId, NodeKind};
use crate::core::entities::{escape_attribute, escape_text};

/// Serialize the children of a node (its inner XML)
pub fn inner_xml(doc: &XmlDocument, id: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(id) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Serialize a node including its own tag (its outer XML)
pub fn outer_xml(doc: &XmlDocument, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &XmlDocument, id: NodeId, out: &mut String) {
    let Some(node) = doc.get_node(id) else {
        return;
    };
    let name = doc.node_name(id).unwrap_or("");

    match node.kind {
        NodeKind::Document => {
            for child in doc.children(id) {
                write_node(doc, child, out);
            }
        }
        NodeKind::Element => {
            out.push('<');
            out.push_str(name);
            for attr in &node.attributes {
                let attr_name = doc.strings.get_str(attr.name_id).unwrap_or("");
                let attr_value = doc.strings.get_str(attr.value_id).unwrap_or("");
                out.push(' ');
                out.push_str(attr_name);
                out.push_str("=\"");
                out.push_str(&escape_attribute(attr_value));
                out.push('"');
            }
            if node.has_children() {
                out.push('>');
                for child in doc.children(id) {
                    write_node(doc, child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            } else {
                out.push_str(" />");
            }
        }
        NodeKind::Text => {
            out.push_str(&escape_text(name));
        }
        NodeKind::CData => {
            out.push_str("<![CDATA[");
            out.push_str(name);
            out.push_str("]]>");
        }
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(name);
            out.push_str("-->");
        }
        NodeKind::ProcessingInstruction => {
            out.push_str("<?");
            out.push_str(name);
            out.push_str("?>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::document::DOCUMENT_NODE;

    #[test]
    fn test_inner_xml() {
        let doc = XmlDocument::parse(b"<root><a id=\"x\">hi</a><b /></root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(inner_xml(&doc, root), "<a id=\"x\">hi</a><b />");
    }

    #[test]
    fn test_outer_xml() {
        let doc = XmlDocument::parse(b"<root><a>hi</a></root>").unwrap();
        let root = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(outer_xml(&doc, root), "<root><a>hi</a></root>");
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = XmlDocument::parse(b"<a>1 &lt; 2 &amp; 3</a>").unwrap();
        let a = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(outer_xml(&doc, a), "<a>1 &lt; 2 &amp; 3</a>");
    }

    #[test]
    fn test_cdata_kept_verbatim() {
        let doc = XmlDocument::parse(b"<a><![CDATA[1 < 2]]></a>").unwrap();
        let a = doc.children(DOCUMENT_NODE).next().unwrap();
        assert_eq!(inner_xml(&doc, a), "<![CDATA[1 < 2]]>");
    }
}
