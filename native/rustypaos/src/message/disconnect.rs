//! Disconnect
//!
//! Sent by the server to release the card-reader slot named by the slot
//! handle inside the message's `ConnectionHandle`.

use super::base::{decode, MessageBase, MessageBody, ProtocolMessage};
use super::error::DecodeError;
use super::PaosType;
use crate::config::DecodeOptions;
use crate::detector::ElementOccurrence;
use std::ops::ControlFlow;

const CONNECTION_HANDLE: &str = "ConnectionHandle";
const SLOT_HANDLE: &str = "SlotHandle";

/// A decoded Disconnect message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disconnect {
    base: MessageBase,
    slot_handle: String,
}

impl Disconnect {
    /// Decode with default limits
    pub fn from_xml(raw: impl Into<Box<[u8]>>) -> Result<Self, DecodeError> {
        Self::from_xml_with(raw, &DecodeOptions::default())
    }

    pub fn from_xml_with(raw: impl Into<Box<[u8]>>, options: &DecodeOptions) -> Result<Self, DecodeError> {
        decode::<DisconnectBody>(raw, options)
    }

    /// Slot handle of the last `ConnectionHandle`, exact text
    ///
    /// Empty if the connection handle carried no `SlotHandle` or an empty one.
    pub fn slot_handle(&self) -> &str {
        &self.slot_handle
    }
}

impl ProtocolMessage for Disconnect {
    fn base(&self) -> &MessageBase {
        &self.base
    }
}

#[derive(Debug, Default)]
struct DisconnectBody {
    connection_handle_seen: bool,
    slot_handle: String,
}

impl DisconnectBody {
    fn handle_connection_handle_child(&mut self, name: &str, value: &str) {
        if name == SLOT_HANDLE {
            value.clone_into(&mut self.slot_handle);
        }
    }
}

impl MessageBody for DisconnectBody {
    const TYPE: PaosType = PaosType::Disconnect;
    type Output = Disconnect;

    fn handle_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
        if element.local_name() == CONNECTION_HANDLE {
            self.connection_handle_seen = true;
        } else if element.parent_local_name() == Some(CONNECTION_HANDLE) {
            self.handle_connection_handle_child(element.local_name(), element.text());
        }
        ControlFlow::Continue(())
    }

    fn finish(self, base: MessageBase) -> Result<Disconnect, DecodeError> {
        if !self.connection_handle_seen {
            return Err(DecodeError::MissingField {
                message_type: Self::TYPE,
                field: CONNECTION_HANDLE,
            });
        }
        Ok(Disconnect {
            base,
            slot_handle: self.slot_handle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LexicalErrorKind;
    use proptest::prelude::*;

    fn disconnect_with(connection_handles: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"
               xmlns:iso="urn:iso:std:iso-iec:24727:tech:schema"
               xmlns:wsa="http://www.w3.org/2005/03/addressing">
  <soap:Header>
    <wsa:MessageID>urn:uuid:9a3c2ee8-32f5-4b62-a4a4-3f2c1d5f0a11</wsa:MessageID>
    <wsa:RelatesTo>urn:uuid:17e7fcfe-2c0e-4b0a-9c2b-2d7b6b0d5b77</wsa:RelatesTo>
  </soap:Header>
  <soap:Body>
    <iso:Disconnect>{connection_handles}</iso:Disconnect>
  </soap:Body>
</soap:Envelope>"#
        )
    }

    fn connection_handle(slot: &str) -> String {
        format!(
            "<iso:ConnectionHandle><iso:ContextHandle>4549445F4946445F434F4E54455854</iso:ContextHandle>\
             <iso:IFDName>REINER SCT cyberJack RFID basis</iso:IFDName>\
             <iso:SlotIndex>0</iso:SlotIndex>{slot}</iso:ConnectionHandle>"
        )
    }

    #[test]
    fn test_slot_handle() {
        let xml = disconnect_with(&connection_handle(
            "<iso:SlotHandle>4549445F4946445F534C4F545F48414E444C45</iso:SlotHandle>",
        ));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "4549445F4946445F534C4F545F48414E444C45");
        assert_eq!(disconnect.message_type(), PaosType::Disconnect);
        assert_eq!(
            disconnect.message_id(),
            Some("urn:uuid:9a3c2ee8-32f5-4b62-a4a4-3f2c1d5f0a11")
        );
        assert_eq!(
            disconnect.relates_to(),
            Some("urn:uuid:17e7fcfe-2c0e-4b0a-9c2b-2d7b6b0d5b77")
        );
    }

    #[test]
    fn test_unprefixed_elements() {
        let xml = "<Disconnect><ConnectionHandle><SlotHandle>AB</SlotHandle></ConnectionHandle></Disconnect>";
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "AB");
    }

    #[test]
    fn test_exact_text_preserved() {
        let xml = disconnect_with(&connection_handle("<iso:SlotHandle> 0A 0B\n</iso:SlotHandle>"));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), " 0A 0B\n");
    }

    #[test]
    fn test_empty_slot_handle() {
        let xml = disconnect_with(&connection_handle("<iso:SlotHandle></iso:SlotHandle>"));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "");

        let xml = disconnect_with(&connection_handle("<iso:SlotHandle/>"));
        assert_eq!(Disconnect::from_xml(xml.as_bytes()).unwrap().slot_handle(), "");
    }

    #[test]
    fn test_connection_handle_without_slot_handle() {
        let xml = disconnect_with(&connection_handle(""));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "");
    }

    #[test]
    fn test_missing_connection_handle() {
        let xml = disconnect_with("");
        let err = Disconnect::from_xml(xml.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                message_type: PaosType::Disconnect,
                field: "ConnectionHandle",
            }
        );
    }

    #[test]
    fn test_slot_handle_outside_connection_handle_ignored() {
        let xml = disconnect_with(&format!(
            "<iso:SlotHandle>stray</iso:SlotHandle>{}",
            connection_handle("<iso:SlotHandle>kept</iso:SlotHandle>")
        ));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "kept");
    }

    #[test]
    fn test_last_connection_handle_wins() {
        let xml = disconnect_with(&format!(
            "{}{}",
            connection_handle("<iso:SlotHandle>first</iso:SlotHandle>"),
            connection_handle("<iso:SlotHandle>second</iso:SlotHandle>")
        ));
        let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
        assert_eq!(disconnect.slot_handle(), "second");
    }

    #[test]
    fn test_malformed_xml() {
        let xml = "<Disconnect><ConnectionHandle><SlotHandle>AB</SlotHandle></Disconnect>";
        match Disconnect::from_xml(xml.as_bytes()) {
            Err(DecodeError::Lexical { message_type, source }) => {
                assert_eq!(message_type, PaosType::Disconnect);
                assert!(matches!(source.kind, LexicalErrorKind::MismatchedEndTag { .. }));
            }
            other => panic!("expected lexical error, got {:?}", other),
        }
    }

    #[test]
    fn test_ill_formed_content_rejected() {
        for slot in [
            "<iso:SlotHandle>A\u{1}B</iso:SlotHandle>",
            "<iso:SlotHandle>\0</iso:SlotHandle>",
            "<iso:SlotHandle>A]]>B</iso:SlotHandle>",
            "<!garbage here><iso:SlotHandle>AB</iso:SlotHandle>",
        ] {
            let xml = disconnect_with(&connection_handle(slot));
            let err = Disconnect::from_xml(xml.as_bytes()).unwrap_err();
            assert!(err.is_lexical(), "accepted {:?}", slot);
        }

        let xml = format!("{}<!DOCTYPE x>", disconnect_with(&connection_handle("")));
        assert!(Disconnect::from_xml(xml.as_bytes()).unwrap_err().is_lexical());
    }

    #[test]
    fn test_unmatched_closing_tag() {
        let xml = "<Disconnect><ConnectionHandle/></Disconnect></SlotHandle>";
        let err = Disconnect::from_xml(xml.as_bytes()).unwrap_err();
        assert!(err.is_lexical());
    }

    #[test]
    fn test_accessor_is_stable() {
        let xml = disconnect_with(&connection_handle("<iso:SlotHandle>00</iso:SlotHandle>"));
        let disconnect = Disconnect::from_xml(xml.into_bytes()).unwrap();
        let first = disconnect.slot_handle().to_string();
        assert_eq!(disconnect.slot_handle(), first);
        assert_eq!(disconnect.slot_handle(), first);
    }

    #[test]
    fn test_owns_raw_bytes() {
        let xml = disconnect_with(&connection_handle("<iso:SlotHandle>00</iso:SlotHandle>"));
        let disconnect = Disconnect::from_xml(xml.clone().into_bytes()).unwrap();
        assert_eq!(disconnect.raw(), xml.as_bytes());
    }

    proptest! {
        #[test]
        fn prop_slot_handle_exact(slot in "[0-9A-Za-z _.:-]{0,40}", prefix in prop_oneof![Just(""), Just("iso:"), Just("ns1:")]) {
            let xml = format!(
                "<{p}Disconnect><{p}ConnectionHandle><{p}SlotHandle>{slot}</{p}SlotHandle></{p}ConnectionHandle></{p}Disconnect>",
                p = prefix,
                slot = slot
            );
            let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
            prop_assert_eq!(disconnect.slot_handle(), slot.as_str());
        }

        #[test]
        fn prop_last_occurrence_wins(slots in proptest::collection::vec("[0-9A-F]{2,16}", 1..5)) {
            let handles: String = slots
                .iter()
                .map(|s| format!("<ConnectionHandle><SlotHandle>{}</SlotHandle></ConnectionHandle>", s))
                .collect();
            let xml = format!("<Disconnect>{}</Disconnect>", handles);
            let disconnect = Disconnect::from_xml(xml.as_bytes()).unwrap();
            prop_assert_eq!(disconnect.slot_handle(), slots.last().unwrap().as_str());
        }
    }
}
