//! XML Attribute Parsing
//!
//! Parses the attribute list of a start tag and keeps it in an ordered set
//! with unique names.

use super::entities::decode_text;
use super::error::{LexicalError, LexicalErrorKind};
use super::scanner::Scanner;
use memchr::memchr;
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: &'a str,
    /// Attribute value (entities decoded)
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: Cow<'a, str>) -> Self {
        Attribute { name, value }
    }

    /// Name after the namespace prefix, if any
    pub fn local_name(&self) -> &'a str {
        local_name(self.name)
    }
}

/// Attributes of one start tag, in document order, names unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes<'a> {
    items: Vec<Attribute<'a>>,
}

impl<'a> Attributes<'a> {
    pub fn new() -> Self {
        Attributes { items: Vec::new() }
    }

    /// Look up a value by qualified name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute<'a>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Insert, rejecting a name already present
    fn insert(&mut self, attribute: Attribute<'a>, offset: usize) -> Result<(), LexicalError> {
        if self.contains(attribute.name) {
            return Err(LexicalError::new(
                LexicalErrorKind::DuplicateAttribute(attribute.name.to_string()),
                offset,
            ));
        }
        self.items.push(attribute);
        Ok(())
    }
}

/// Split off the namespace prefix (before the first colon)
#[inline]
pub fn local_name(name: &str) -> &str {
    match memchr(b':', name.as_bytes()) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Parse attributes from the cursor up to (not including) `>` or `/>`
///
/// The scanner must sit right after the element name. At least one
/// whitespace byte is required before each attribute.
pub fn parse_attributes<'a>(scanner: &mut Scanner<'a>) -> Result<Attributes<'a>, LexicalError> {
    let mut attrs = Attributes::new();

    loop {
        let had_space = scanner.skip_whitespace();
        match scanner.peek() {
            None => {
                return Err(LexicalError::new(
                    LexicalErrorKind::UnexpectedEof("start tag"),
                    scanner.position(),
                ))
            }
            Some(b'>') | Some(b'/') => return Ok(attrs),
            Some(_) if !had_space => {
                return Err(LexicalError::new(
                    LexicalErrorKind::MalformedAttribute("whitespace required before attribute"),
                    scanner.position(),
                ))
            }
            Some(_) => {}
        }

        let name_offset = scanner.position();
        let name = scanner.read_name().ok_or_else(|| {
            LexicalError::new(LexicalErrorKind::InvalidName, name_offset)
        })?;

        scanner.skip_whitespace();
        if scanner.peek() != Some(b'=') {
            return Err(LexicalError::new(
                LexicalErrorKind::MalformedAttribute("attribute value required"),
                scanner.position(),
            ));
        }
        scanner.advance(1);
        scanner.skip_whitespace();

        let quote = match scanner.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            Some(_) => {
                return Err(LexicalError::new(
                    LexicalErrorKind::MalformedAttribute("attribute value must be quoted"),
                    scanner.position(),
                ))
            }
            None => {
                return Err(LexicalError::new(
                    LexicalErrorKind::UnexpectedEof("attribute value"),
                    scanner.position(),
                ))
            }
        };
        scanner.advance(1);

        let value_start = scanner.position();
        let value_end = loop {
            match scanner.peek() {
                Some(b) if b == quote => {
                    let end = scanner.position();
                    scanner.advance(1);
                    break end;
                }
                Some(b'<') => {
                    return Err(LexicalError::new(
                        LexicalErrorKind::MalformedAttribute("attribute value cannot contain '<'"),
                        scanner.position(),
                    ))
                }
                Some(_) => scanner.advance(1),
                None => {
                    return Err(LexicalError::new(
                        LexicalErrorKind::UnexpectedEof("attribute value"),
                        scanner.position(),
                    ))
                }
            }
        };

        let value = decode_text(scanner.slice(value_start, value_end), value_start)?;
        attrs.insert(Attribute::new(name, value), name_offset)?;
    }
}
