//! Message type detection
//!
//! The type of a PAOS message is the local name of the first element inside
//! the SOAP `Body`. Detection stops at the first element that closes inside
//! that body child, so only a prefix of the message is scanned and the rest
//! is not validated. Messages without an `Envelope` are classified by their
//! root element.

use super::PaosType;
use crate::config::DecodeOptions;
use crate::core::attributes::local_name;
use crate::core::error::LexicalError;
use crate::detector::{detect, ElementHandler, ElementOccurrence};
use std::ops::ControlFlow;

const ENVELOPE: &str = "Envelope";
const BODY: &str = "Body";

/// Classify a message with default limits
pub fn detect_type(raw: &[u8]) -> Result<PaosType, LexicalError> {
    detect_type_with(raw, &DecodeOptions::default())
}

pub fn detect_type_with(raw: &[u8], options: &DecodeOptions) -> Result<PaosType, LexicalError> {
    let mut detector = TypeDetector::default();
    detect(raw, options, &mut detector)?;
    Ok(detector.found)
}

#[derive(Default)]
struct TypeDetector {
    found: PaosType,
}

impl ElementHandler for TypeDetector {
    fn handle_found_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
        match classify(element) {
            Some(message_type) => {
                self.found = message_type;
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        }
    }
}

/// Type decided by this occurrence, or None to keep scanning
fn classify(element: &ElementOccurrence<'_>) -> Option<PaosType> {
    let chain: Vec<&str> = element
        .ancestors()
        .chain(std::iter::once(element.name()))
        .map(local_name)
        .collect();

    if chain[0] != ENVELOPE {
        return Some(PaosType::from_element_name(chain[0]));
    }
    // Envelope with elements closing in Header: keep going until Body
    let body = chain.iter().position(|name| *name == BODY)?;
    Some(
        chain
            .get(body + 1)
            .map_or(PaosType::Unknown, |name| PaosType::from_element_name(name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_body() {
        let xml = br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Header><wsa:MessageID>urn:uuid:1</wsa:MessageID></soap:Header>
  <soap:Body><iso:Disconnect><iso:ConnectionHandle/></iso:Disconnect></soap:Body>
</soap:Envelope>"#;
        assert_eq!(detect_type(xml).unwrap(), PaosType::Disconnect);
    }

    #[test]
    fn test_detect_empty_body_child() {
        let xml = b"<Envelope><Body><DIDList/></Body></Envelope>";
        assert_eq!(detect_type(xml).unwrap(), PaosType::DidList);
    }

    #[test]
    fn test_detect_without_envelope() {
        assert_eq!(
            detect_type(b"<InitializeFramework><x/></InitializeFramework>").unwrap(),
            PaosType::InitializeFramework
        );
    }

    #[test]
    fn test_empty_body_is_unknown() {
        assert_eq!(
            detect_type(b"<Envelope><Header/><Body></Body></Envelope>").unwrap(),
            PaosType::Unknown
        );
    }

    #[test]
    fn test_unrecognized_body_is_unknown() {
        assert_eq!(
            detect_type(b"<Envelope><Body><Ping/></Body></Envelope>").unwrap(),
            PaosType::Unknown
        );
    }

    #[test]
    fn test_stops_before_the_rest() {
        // Malformed tail is never scanned
        let xml = b"<Envelope><Body><Transmit><SlotHandle>00</SlotHandle></Transmit></Body></Envelope></Oops>";
        assert_eq!(detect_type(xml).unwrap(), PaosType::Transmit);
    }

    #[test]
    fn test_malformed_prefix_fails() {
        assert!(detect_type(b"<Envelope><Body></Envelope>").is_err());
    }
}
