//! PAOS Messages
//!
//! Decoded inbound messages. Each type is a thin consumer of the element
//! detector:
//!
//! ```text
//! raw bytes ---> decode::<Body>() ---> ElementDetector ---> MessageDecoder
//!                                                            |-- MessageHeader (MessageID, RelatesTo)
//!                                                            |-- Body (per message type)
//! ```
//!
//! Messages are decoded once at construction and immutable afterwards.

mod base;
mod detect;
mod disconnect;
mod error;
mod start_paos_response;

pub use base::{decode, MessageBase, MessageBody, MessageHeader, ProtocolMessage};
pub use detect::{detect_type, detect_type_with};
pub use disconnect::Disconnect;
pub use error::DecodeError;
pub use start_paos_response::{PaosResult, StartPaosResponse};

use crate::config::DecodeOptions;
use std::fmt;
use tracing::debug;

/// PAOS message types, named after the first element of the SOAP body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PaosType {
    StartPaos,
    StartPaosResponse,
    InitializeFramework,
    DidList,
    DidAuthenticate,
    Transmit,
    Disconnect,
    #[default]
    Unknown,
}

impl PaosType {
    /// Body element local name for this type
    pub fn element_name(&self) -> &'static str {
        match self {
            PaosType::StartPaos => "StartPAOS",
            PaosType::StartPaosResponse => "StartPAOSResponse",
            PaosType::InitializeFramework => "InitializeFramework",
            PaosType::DidList => "DIDList",
            PaosType::DidAuthenticate => "DIDAuthenticate",
            PaosType::Transmit => "Transmit",
            PaosType::Disconnect => "Disconnect",
            PaosType::Unknown => "Unknown",
        }
    }

    /// Classify a body element by its local name
    pub fn from_element_name(local_name: &str) -> Self {
        match local_name {
            "StartPAOS" => PaosType::StartPaos,
            "StartPAOSResponse" => PaosType::StartPaosResponse,
            "InitializeFramework" => PaosType::InitializeFramework,
            "DIDList" => PaosType::DidList,
            "DIDAuthenticate" => PaosType::DidAuthenticate,
            "Transmit" => PaosType::Transmit,
            "Disconnect" => PaosType::Disconnect,
            _ => PaosType::Unknown,
        }
    }
}

impl fmt::Display for PaosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Any message this crate can decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Disconnect(Disconnect),
    StartPaosResponse(StartPaosResponse),
}

impl Message {
    /// Classify the body and decode with the matching message type
    ///
    /// Classification stops at the first body element, so only the decode
    /// itself scans the whole message.
    pub fn decode(raw: impl Into<Box<[u8]>>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let raw: Box<[u8]> = raw.into();
        base::check_size(PaosType::Unknown, raw.len(), options)?;

        let message_type = detect_type_with(&raw, options).map_err(|source| DecodeError::Lexical {
            message_type: PaosType::Unknown,
            source,
        })?;
        debug!(%message_type, "dispatching message");

        match message_type {
            PaosType::Disconnect => Disconnect::from_xml_with(raw, options).map(Message::Disconnect),
            PaosType::StartPaosResponse => {
                StartPaosResponse::from_xml_with(raw, options).map(Message::StartPaosResponse)
            }
            found => Err(DecodeError::Unsupported { found }),
        }
    }

    pub fn as_disconnect(&self) -> Option<&Disconnect> {
        match self {
            Message::Disconnect(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_start_paos_response(&self) -> Option<&StartPaosResponse> {
        match self {
            Message::StartPaosResponse(r) => Some(r),
            _ => None,
        }
    }
}

impl ProtocolMessage for Message {
    fn base(&self) -> &MessageBase {
        match self {
            Message::Disconnect(d) => d.base(),
            Message::StartPaosResponse(r) => r.base(),
        }
    }
}
