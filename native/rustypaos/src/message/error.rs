//! Decode failures
//!
//! Every failure while constructing a message collapses into one
//! `DecodeError`. A message value only exists if decoding fully succeeded.

use super::PaosType;
use crate::core::error::LexicalError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The bytes are not well-formed XML
    #[error("{message_type} message is malformed: {source}")]
    Lexical {
        message_type: PaosType,
        #[source]
        source: LexicalError,
    },

    /// Well-formed, but an element the message type requires never appeared
    #[error("{message_type} message lacks mandatory element {field}")]
    MissingField {
        message_type: PaosType,
        field: &'static str,
    },

    /// Rejected before scanning
    #[error("{message_type} message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        message_type: PaosType,
        size: usize,
        limit: usize,
    },

    /// The body holds a message type without a decoder
    #[error("no decoder for {found} messages")]
    Unsupported { found: PaosType },
}

impl DecodeError {
    /// Message type the failure belongs to
    pub fn message_type(&self) -> PaosType {
        match *self {
            DecodeError::Lexical { message_type, .. }
            | DecodeError::MissingField { message_type, .. }
            | DecodeError::TooLarge { message_type, .. } => message_type,
            DecodeError::Unsupported { found } => found,
        }
    }

    /// Stable short name of the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Lexical { .. } => "lexical_error",
            DecodeError::MissingField { .. } => "missing_field",
            DecodeError::TooLarge { .. } => "too_large",
            DecodeError::Unsupported { .. } => "unsupported_message",
        }
    }

    pub fn is_lexical(&self) -> bool {
        matches!(self, DecodeError::Lexical { .. })
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, DecodeError::MissingField { .. })
    }
}
