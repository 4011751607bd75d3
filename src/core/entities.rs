//! XML entity decoding and escaping
//!
//! Decoding handles the built-in entities (&lt; &gt; &amp; &quot; &apos;)
//! and numeric character references (&#123; &#x7B;). Uses Cow so text
//! without entities is passed through without copying.
//!
//! Escaping is the inverse direction, used when serializing inner XML.

use memchr::{memchr, memchr2, memchr3};
use std::borrow::Cow;

/// Decode text content, handling entity references.
///
/// Returns Borrowed if no entities are present (zero-copy),
/// Owned if entities were decoded. Unknown entities and bare ampersands
/// are kept verbatim.
#[inline]
pub fn decode_text(input: &[u8]) -> Cow<'_, [u8]> {
    if memchr(b'&', input).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

/// Decode all entity references in the input
fn decode_entities(input: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        match memchr(b'&', &input[pos..]) {
            Some(amp_offset) => {
                result.extend_from_slice(&input[pos..pos + amp_offset]);
                pos += amp_offset;

                if let Some(semi_offset) = memchr(b';', &input[pos..]) {
                    let entity = &input[pos + 1..pos + semi_offset];
                    if let Some(decoded) = decode_entity(entity) {
                        result.extend_from_slice(decoded.as_bytes());
                        pos += semi_offset + 1;
                        continue;
                    }
                }

                // No semicolon or unknown entity: keep the ampersand
                result.push(b'&');
                pos += 1;
            }
            None => {
                result.extend_from_slice(&input[pos..]);
                break;
            }
        }
    }

    result
}

/// Decode a single entity (the text between '&' and ';')
fn decode_entity(entity: &[u8]) -> Option<String> {
    if entity.is_empty() {
        return None;
    }

    if entity[0] == b'#' {
        return decode_numeric_entity(&entity[1..]);
    }

    match entity {
        b"lt" => Some("<".to_string()),
        b"gt" => Some(">".to_string()),
        b"amp" => Some("&".to_string()),
        b"quot" => Some("\"".to_string()),
        b"apos" => Some("'".to_string()),
        _ => None,
    }
}

/// Decode a numeric character reference (decimal or hex after '#')
fn decode_numeric_entity(digits: &[u8]) -> Option<String> {
    let code = if digits.first() == Some(&b'x') || digits.first() == Some(&b'X') {
        u32::from_str_radix(std::str::from_utf8(&digits[1..]).ok()?, 16).ok()?
    } else {
        std::str::from_utf8(digits).ok()?.parse::<u32>().ok()?
    };

    char::from_u32(code).map(|c| c.to_string())
}

/// Escape text content for serialization ('<', '>', '&')
pub fn escape_text(input: &str) -> Cow<'_, str> {
    if memchr3(b'<', b'>', b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Escape an attribute value for serialization ('<', '&', '"')
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    if memchr3(b'<', b'&', b'"', input.as_bytes()).is_none()
        && memchr2(b'\'', b'>', input.as_bytes()).is_none()
    {
        return Cow::Borrowed(input);
    }

    let mut result = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
