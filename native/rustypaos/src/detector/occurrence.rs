//! Element occurrences handed to detector callbacks

use crate::core::attributes::{local_name, Attributes};
use std::borrow::Cow;

/// An element that is open while the detector scans its content
#[derive(Debug)]
pub(super) struct OpenElement<'a> {
    pub(super) name: &'a str,
    pub(super) attributes: Attributes<'a>,
    pub(super) text: Cow<'a, str>,
}

impl<'a> OpenElement<'a> {
    pub(super) fn new(name: &'a str, attributes: Attributes<'a>) -> Self {
        OpenElement {
            name,
            attributes,
            text: Cow::Borrowed(""),
        }
    }

    /// Append a run of direct character data
    pub(super) fn push_text(&mut self, text: Cow<'a, str>) {
        if self.text.is_empty() {
            self.text = text;
        } else {
            self.text.to_mut().push_str(&text);
        }
    }
}

/// One closed element, valid only for the duration of the callback
///
/// Text is the element's own character data (text and CDATA runs that are
/// direct children, concatenated). An element without character data has
/// empty text, never an absent one.
#[derive(Debug, Clone, Copy)]
pub struct ElementOccurrence<'d> {
    name: &'d str,
    text: &'d str,
    attributes: &'d Attributes<'d>,
    ancestors: &'d [OpenElement<'d>],
}

impl<'d> ElementOccurrence<'d> {
    pub(super) fn new(
        name: &'d str,
        text: &'d str,
        attributes: &'d Attributes<'d>,
        ancestors: &'d [OpenElement<'d>],
    ) -> Self {
        ElementOccurrence {
            name,
            text,
            attributes,
            ancestors,
        }
    }

    /// Qualified name, exactly as written in the tag
    pub fn name(&self) -> &'d str {
        self.name
    }

    /// Name without its namespace prefix
    pub fn local_name(&self) -> &'d str {
        local_name(self.name)
    }

    pub fn text(&self) -> &'d str {
        self.text
    }

    /// Attributes of the opening tag
    pub fn attributes(&self) -> &'d Attributes<'d> {
        self.attributes
    }

    /// Qualified name of the enclosing element
    pub fn parent(&self) -> Option<&'d str> {
        self.ancestors.last().map(|e| e.name)
    }

    /// Local name of the enclosing element
    pub fn parent_local_name(&self) -> Option<&'d str> {
        self.parent().map(local_name)
    }

    /// Qualified names of enclosing elements, root first
    pub fn ancestors(&self) -> impl DoubleEndedIterator<Item = &'d str> + ExactSizeIterator + 'd {
        self.ancestors.iter().map(|e| e.name)
    }

    /// Number of enclosing elements; the root element has depth 0
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}
