//! XML Event Types
//!
//! The lexical events a `LexicalSource` hands to the element detector.
//! Comments, processing instructions, the XML declaration and DOCTYPE are
//! consumed by the lexer and never surface here.

use crate::core::attributes::{local_name, Attributes};
use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent<'a> {
    /// Start of an element: `<name attrs...>` or `<name attrs.../>`
    Start(StartTag<'a>),
    /// End of an element: `</name>`
    End(EndTag<'a>),
    /// Character data or CDATA content, entities decoded
    Text(Cow<'a, str>),
}

/// Start tag event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag<'a> {
    /// Qualified element name (may include prefix)
    pub name: &'a str,
    pub attributes: Attributes<'a>,
    /// True for `<name/>`; no `End` event follows
    pub self_closing: bool,
    /// Byte offset of the opening '<'
    pub offset: usize,
}

impl<'a> StartTag<'a> {
    pub fn local_name(&self) -> &'a str {
        local_name(self.name)
    }
}

/// End tag event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndTag<'a> {
    pub name: &'a str,
    /// Byte offset of the opening '<'
    pub offset: usize,
}

impl<'a> XmlEvent<'a> {
    pub fn is_start(&self) -> bool {
        matches!(self, XmlEvent::Start(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, XmlEvent::End(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlEvent::Text(t) => Some(t.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_tag_local_name() {
        let tag = StartTag {
            name: "iso:ConnectionHandle",
            attributes: Attributes::new(),
            self_closing: false,
            offset: 0,
        };
        assert_eq!(tag.local_name(), "ConnectionHandle");
    }

    #[test]
    fn test_event_accessors() {
        let text = XmlEvent::Text(Cow::Borrowed("abc"));
        assert_eq!(text.as_text(), Some("abc"));
        assert!(!text.is_start());

        let end = XmlEvent::End(EndTag { name: "a", offset: 3 });
        assert!(end.is_end());
        assert_eq!(end.as_text(), None);
    }
}
