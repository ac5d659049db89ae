//! Lexical errors
//!
//! Every well-formedness failure found while scanning a message ends the
//! pass with one of these. There is no recovery and no partial result.

use thiserror::Error;

/// What went wrong while scanning
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalErrorKind {
    #[error("input is not valid UTF-8")]
    InvalidUtf8,
    #[error("unexpected end of input inside {0}")]
    UnexpectedEof(&'static str),
    #[error("expected a name")]
    InvalidName,
    #[error("malformed tag: {0}")]
    MalformedTag(&'static str),
    #[error("malformed attribute: {0}")]
    MalformedAttribute(&'static str),
    #[error("duplicate attribute `{0}`")]
    DuplicateAttribute(String),
    #[error("unknown entity `&{0};`")]
    UnknownEntity(String),
    #[error("invalid character reference `&{0};`")]
    InvalidCharacterReference(String),
    #[error("character U+{0:04X} is not allowed in XML")]
    InvalidCharacter(u32),
    #[error("`]]>` is not allowed in character data")]
    CdataEndInText,
    #[error("end tag `</{found}>` does not match open element `<{expected}>`")]
    MismatchedEndTag { expected: String, found: String },
    #[error("end tag `</{0}>` has no open element")]
    UnexpectedEndTag(String),
    #[error("element `<{0}>` is never closed")]
    UnclosedElement(String),
    #[error("character data outside the root element")]
    TextOutsideRoot,
    #[error("more than one root element")]
    MultipleRoots,
    #[error("document has no root element")]
    NoRootElement,
    #[error("element nesting exceeds {0} levels")]
    DepthLimitExceeded(usize),
}

/// A lexical failure and the byte offset it was detected at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub offset: usize,
}

impl LexicalError {
    #[inline]
    pub fn new(kind: LexicalErrorKind, offset: usize) -> Self {
        LexicalError { kind, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset() {
        let err = LexicalError::new(
            LexicalErrorKind::MismatchedEndTag {
                expected: "a".into(),
                found: "b".into(),
            },
            12,
        );
        assert_eq!(
            err.to_string(),
            "end tag `</b>` does not match open element `<a>` at byte 12"
        );
    }
}
