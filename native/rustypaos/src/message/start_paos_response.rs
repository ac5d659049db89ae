//! StartPAOSResponse
//!
//! Final server message of a PAOS session carrying the overall result.

use super::base::{decode, MessageBase, MessageBody, ProtocolMessage};
use super::error::DecodeError;
use super::PaosType;
use crate::config::DecodeOptions;
use crate::detector::ElementOccurrence;
use std::ops::ControlFlow;

const RESULT: &str = "Result";
const RESULT_MAJOR: &str = "ResultMajor";
const RESULT_MINOR: &str = "ResultMinor";
const RESULT_MESSAGE: &str = "ResultMessage";

/// eCard API result triple
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaosResult {
    major: String,
    minor: Option<String>,
    message: Option<String>,
}

impl PaosResult {
    /// Result major URI, e.g. `...resultmajor#ok`
    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> Option<&str> {
        self.minor.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.major.ends_with("#ok")
    }
}

/// A decoded StartPAOSResponse message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPaosResponse {
    base: MessageBase,
    result: PaosResult,
}

impl StartPaosResponse {
    pub fn from_xml(raw: impl Into<Box<[u8]>>) -> Result<Self, DecodeError> {
        Self::from_xml_with(raw, &DecodeOptions::default())
    }

    pub fn from_xml_with(raw: impl Into<Box<[u8]>>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        decode::<StartPaosResponseBody>(raw, options)
    }

    pub fn result(&self) -> &PaosResult {
        &self.result
    }
}

impl ProtocolMessage for StartPaosResponse {
    fn base(&self) -> &MessageBase {
        &self.base
    }
}

#[derive(Debug, Default)]
struct StartPaosResponseBody {
    major: Option<String>,
    minor: Option<String>,
    message: Option<String>,
}

impl MessageBody for StartPaosResponseBody {
    const TYPE: PaosType = PaosType::StartPaosResponse;
    type Output = StartPaosResponse;

    fn handle_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
        if element.parent_local_name() != Some(RESULT) {
            return ControlFlow::Continue(());
        }
        let slot = match element.local_name() {
            RESULT_MAJOR => &mut self.major,
            RESULT_MINOR => &mut self.minor,
            RESULT_MESSAGE => &mut self.message,
            _ => return ControlFlow::Continue(()),
        };
        *slot = Some(element.text().to_string());
        ControlFlow::Continue(())
    }

    fn finish(self, base: MessageBase) -> Result<StartPaosResponse, DecodeError> {
        let major = self.major.ok_or(DecodeError::MissingField {
            message_type: Self::TYPE,
            field: RESULT_MAJOR,
        })?;
        Ok(StartPaosResponse {
            base,
            result: PaosResult {
                major,
                minor: self.minor,
                message: self.message,
            },
        })
    }
}
