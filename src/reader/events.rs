//! XML parsing events
//!
//! Event types produced by the pull reader. Names and text borrow from the
//! input buffer where possible; entity decoding may force an owned copy.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// Start of an element: `<name attrs...>`
    StartElement(StartElement<'a>),
    /// End of an element: `</name>`
    EndElement { name: &'a [u8] },
    /// Empty element: `<name attrs.../>`
    EmptyElement(StartElement<'a>),
    /// Text content between tags (entities decoded)
    Text(Cow<'a, [u8]>),
    /// CDATA section content (verbatim)
    CData(&'a [u8]),
    /// Comment content
    Comment(&'a [u8]),
    /// Processing instruction or XML declaration: `<?target data?>`
    ProcessingInstruction { target: &'a [u8] },
    /// DOCTYPE declaration
    DocType(&'a [u8]),
    /// End of document
    EndDocument,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Element name (may include a namespace prefix)
    pub name: &'a [u8],
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }

    /// Get an attribute value by name as a string
    pub fn get_attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name_str() == Some(name))
            .and_then(|a| a.value_str())
    }
}

impl<'a> XmlEvent<'a> {
    /// Check if this is a start element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, XmlEvent::StartElement(_) | XmlEvent::EmptyElement(_))
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            XmlEvent::Text(t) => Some(t.as_ref()),
            XmlEvent::CData(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_element_name() {
        let elem = StartElement {
            name: b"div",
            attributes: vec![],
        };
        assert_eq!(elem.name_str(), Some("div"));
    }

    #[test]
    fn test_event_predicates() {
        let start = XmlEvent::StartElement(StartElement {
            name: b"a",
            attributes: vec![],
        });
        assert!(start.is_start_element());
        assert!(start.as_text().is_none());

        let text = XmlEvent::Text(std::borrow::Cow::Borrowed(b"hi" as &[u8]));
        assert_eq!(text.as_text(), Some(b"hi" as &[u8]));
    }
}
