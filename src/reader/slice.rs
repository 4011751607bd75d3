//! Pull reader over a byte slice
//!
//! Parses XML from a byte slice, borrowing names and text from the input
//! wherever entity decoding allows. Malformed markup is an error; there is
//! no recovery mode.

use super::events::{StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::entities::decode_text;
use crate::core::scanner::Scanner;
use crate::error::QueryError;

/// Pull-based XML reader over a byte slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new reader over the input
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            scanner: Scanner::new(input),
        }
    }

    /// Get the next XML event.
    ///
    /// Returns `EndDocument` at end of input, and keeps returning it after.
    pub fn next_event(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        if self.scanner.is_eof() {
            return Ok(XmlEvent::EndDocument);
        }

        // Text runs until the next tag start
        if self.scanner.peek() != Some(b'<') {
            let start = self.scanner.position();
            let end = match self.scanner.find_tag_start() {
                Some(pos) => pos,
                None => {
                    let text = self.scanner.slice(start, self.scanner.input_len());
                    self.scanner.set_position(self.scanner.input_len());
                    return Ok(XmlEvent::Text(decode_text(text)));
                }
            };
            let text = self.scanner.slice(start, end);
            self.scanner.set_position(end);
            return Ok(XmlEvent::Text(decode_text(text)));
        }

        if self.scanner.starts_with(b"<!--") {
            return self.read_comment();
        }
        if self.scanner.starts_with(b"<![CDATA[") {
            return self.read_cdata();
        }
        if self.scanner.starts_with(b"<!DOCTYPE") || self.scanner.starts_with(b"<!doctype") {
            return self.read_doctype();
        }
        if self.scanner.starts_with(b"<?") {
            return self.read_processing_instruction();
        }
        if self.scanner.starts_with(b"</") {
            return self.read_end_tag();
        }
        self.read_start_tag()
    }

    fn read_comment(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        let content_start = self.scanner.position() + 4;
        self.scanner.set_position(content_start);
        let end = self
            .scanner
            .find_sequence(b"-->")
            .ok_or_else(|| QueryError::Parse("unterminated comment".into()))?;
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + 3);
        Ok(XmlEvent::Comment(content))
    }

    fn read_cdata(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        let content_start = self.scanner.position() + 9;
        self.scanner.set_position(content_start);
        let end = self
            .scanner
            .find_sequence(b"]]>")
            .ok_or_else(|| QueryError::Parse("unterminated CDATA section".into()))?;
        let content = self.scanner.slice(content_start, end);
        self.scanner.set_position(end + 3);
        Ok(XmlEvent::CData(content))
    }

    fn read_doctype(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| QueryError::Parse("unterminated DOCTYPE declaration".into()))?;
        let content = self.scanner.slice(start + 9, end);
        self.scanner.set_position(end + 1);
        Ok(XmlEvent::DocType(content))
    }

    fn read_processing_instruction(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        self.scanner.advance(2);
        let target = self
            .scanner
            .read_name()
            .ok_or_else(|| QueryError::Parse("malformed processing instruction target".into()))?;
        let end = self
            .scanner
            .find_sequence(b"?>")
            .ok_or_else(|| QueryError::Parse("unterminated processing instruction".into()))?;
        self.scanner.set_position(end + 2);
        Ok(XmlEvent::ProcessingInstruction { target })
    }

    fn read_end_tag(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        self.scanner.advance(2);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| QueryError::Parse("malformed closing tag name".into()))?;
        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'>') {
            return Err(QueryError::Parse(format!(
                "closing tag '{}' is not terminated",
                String::from_utf8_lossy(name)
            )));
        }
        self.scanner.advance(1);
        Ok(XmlEvent::EndElement { name })
    }

    fn read_start_tag(&mut self) -> Result<XmlEvent<'a>, QueryError> {
        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| QueryError::Parse("malformed tag name".into()))?;

        let attr_start = self.scanner.position();
        let tag_end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| {
                QueryError::Parse(format!(
                    "tag '{}' is not terminated",
                    String::from_utf8_lossy(name)
                ))
            })?;

        let is_empty = tag_end > attr_start && self.scanner.slice(tag_end - 1, tag_end) == b"/";
        let attr_end = if is_empty { tag_end - 1 } else { tag_end };

        let attributes = parse_attributes(self.scanner.slice(attr_start, attr_end))
            .map_err(|msg| QueryError::Parse(msg.into()))?;
        self.scanner.set_position(tag_end + 1);

        let element = StartElement { name, attributes };
        if is_empty {
            Ok(XmlEvent::EmptyElement(element))
        } else {
            Ok(XmlEvent::StartElement(element))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_events(input: &[u8]) -> Vec<XmlEvent<'_>> {
        let mut reader = SliceReader::new(input);
        let mut events = Vec::new();
        loop {
            match reader.next_event().unwrap() {
                XmlEvent::EndDocument => break,
                event => events.push(event),
            }
        }
        events
    }

    #[test]
    fn test_simple_element() {
        let events = collect_events(b"<root>hello</root>");
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], XmlEvent::StartElement(e) if e.name == b"root"));
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"hello"));
        assert!(matches!(&events[2], XmlEvent::EndElement { name } if *name == b"root"));
    }

    #[test]
    fn test_empty_element() {
        let events = collect_events(b"<br/>");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], XmlEvent::EmptyElement(e) if e.name == b"br"));
    }

    #[test]
    fn test_attributes() {
        let events = collect_events(b"<div id=\"main\" class=\"container\"/>");
        if let XmlEvent::EmptyElement(e) = &events[0] {
            assert_eq!(e.get_attribute_value("id"), Some("main"));
            assert_eq!(e.get_attribute_value("class"), Some("container"));
        } else {
            panic!("expected EmptyElement");
        }
    }

    #[test]
    fn test_cdata() {
        let events = collect_events(b"<script><![CDATA[1 < 2]]></script>");
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[1], XmlEvent::CData(c) if *c == b"1 < 2"));
    }

    #[test]
    fn test_comment_and_declaration() {
        let events = collect_events(b"<?xml version=\"1.0\"?><!-- note --><root/>");
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], XmlEvent::ProcessingInstruction { target } if *target == b"xml"));
        assert!(matches!(&events[1], XmlEvent::Comment(c) if *c == b" note "));
    }

    #[test]
    fn test_entity_in_text() {
        let events = collect_events(b"<a>x &amp; y</a>");
        assert!(matches!(&events[1], XmlEvent::Text(t) if t.as_ref() == b"x & y"));
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let mut reader = SliceReader::new(b"<!-- never closed");
        assert!(reader.next_event().is_err());
    }

    #[test]
    fn test_unterminated_tag_is_error() {
        let mut reader = SliceReader::new(b"<root attr=\"v\"");
        assert!(reader.next_event().is_err());
    }
}
