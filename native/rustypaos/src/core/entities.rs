//! XML Entity Decoding
//!
//! Handles decoding of the predefined entities (&lt; &gt; &amp; &quot;
//! &apos;) and numeric character references (&#123; &#x7B;).
//!
//! PAOS messages carry no DTD, so any other entity name is an error.
//! Uses Cow for zero-copy when no entities are present.

use super::error::{LexicalError, LexicalErrorKind};
use memchr::memchr;
use std::borrow::Cow;

/// Decode character data or an attribute value
///
/// `base` is the byte offset of `input` in the message, used for error
/// positions. Literal characters must be XML Chars. Returns Borrowed if no
/// entities are present.
pub fn decode_text(input: &str, base: usize) -> Result<Cow<'_, str>, LexicalError> {
    check_chars(input, base)?;
    let bytes = input.as_bytes();
    let Some(first_amp) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(input));
    };

    let mut result = String::with_capacity(input.len());
    let mut pos = first_amp;
    result.push_str(&input[..pos]);

    loop {
        // pos is at '&'
        let Some(semi) = memchr(b';', &bytes[pos..]) else {
            return Err(LexicalError::new(
                LexicalErrorKind::UnexpectedEof("entity reference"),
                base + pos,
            ));
        };
        let entity = &input[pos + 1..pos + semi];
        result.push(decode_entity(entity).map_err(|kind| LexicalError::new(kind, base + pos))?);
        pos += semi + 1;

        match memchr(b'&', &bytes[pos..]) {
            Some(next) => {
                result.push_str(&input[pos..pos + next]);
                pos += next;
            }
            None => {
                result.push_str(&input[pos..]);
                break;
            }
        }
    }

    Ok(Cow::Owned(result))
}

/// Decode a single entity (without & and ;)
fn decode_entity(entity: &str) -> Result<char, LexicalErrorKind> {
    if let Some(reference) = entity.strip_prefix('#') {
        return decode_char_reference(reference)
            .ok_or_else(|| LexicalErrorKind::InvalidCharacterReference(entity.to_string()));
    }

    match entity {
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "amp" => Ok('&'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        _ => Err(LexicalErrorKind::UnknownEntity(entity.to_string())),
    }
}

/// Decode a numeric character reference body (after '#')
fn decode_char_reference(reference: &str) -> Option<char> {
    let codepoint = match reference.strip_prefix('x') {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            u32::from_str_radix(hex, 16).ok()?
        }
        Some(_) => return None,
        None if !reference.is_empty() && reference.bytes().all(|b| b.is_ascii_digit()) => {
            reference.parse::<u32>().ok()?
        }
        None => return None,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Reject literal characters outside the XML Char production
pub fn check_chars(input: &str, base: usize) -> Result<(), LexicalError> {
    // Everything that can fail is a C0 control or starts with 0xEF (U+FFFE, U+FFFF)
    if input.bytes().all(|b| (b >= 0x20 && b != 0xEF) || matches!(b, b'\t' | b'\n' | b'\r')) {
        return Ok(());
    }
    match input.char_indices().find(|&(_, c)| !is_valid_xml_char(c as u32)) {
        Some((i, c)) => Err(LexicalError::new(
            LexicalErrorKind::InvalidCharacter(c as u32),
            base + i,
        )),
        None => Ok(()),
    }
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text("3B0C3F8A", 0).unwrap();
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "3B0C3F8A");
    }

    #[test]
    fn test_basic_entities() {
        let result = decode_text("&lt;hello&gt; &amp; &quot;world&quot; &apos;", 0).unwrap();
        assert_eq!(result, "<hello> & \"world\" '");
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_text("&#65;&#x42;&#x1F600;", 0).unwrap(), "AB😀");
    }

    #[test]
    fn test_unknown_entity_is_an_error() {
        let err = decode_text("ab&nbsp;", 10).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::UnknownEntity("nbsp".into()));
        assert_eq!(err.offset, 12);
    }

    #[test]
    fn test_invalid_character_reference() {
        let err = decode_text("&#0;", 0).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::InvalidCharacterReference("#0".into()));
        assert!(decode_text("&#xZZ;", 0).is_err());
        assert!(decode_text("&#;", 0).is_err());
    }

    #[test]
    fn test_literal_control_characters_rejected() {
        let err = decode_text("A\u{1}B", 20).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::InvalidCharacter(1));
        assert_eq!(err.offset, 21);

        let err = decode_text("\0", 0).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::InvalidCharacter(0));
        assert!(decode_text("x\u{FFFE}", 0).is_err());
    }

    #[test]
    fn test_allowed_whitespace_and_non_ascii() {
        assert_eq!(decode_text("a\tb\r\nGrüße \u{FFFD}", 0).unwrap(), "a\tb\r\nGrüße \u{FFFD}");
        assert!(check_chars("\u{E000}\u{10FFFF}", 0).is_ok());
    }

    #[test]
    fn test_unterminated_reference() {
        let err = decode_text("a &amp b", 0).unwrap_err();
        assert_eq!(err.kind, LexicalErrorKind::UnexpectedEof("entity reference"));
    }
}
