//! Shared message base and decode routine
//!
//! A concrete message type supplies a [`MessageBody`]: the decoding state
//! that watches for its elements of interest. [`decode`] composes that body
//! with the WS-Addressing header collector, runs the detector once over the
//! raw bytes and hands the populated state to [`MessageBody::finish`].

use super::error::DecodeError;
use super::PaosType;
use crate::config::DecodeOptions;
use crate::detector::{detect, ElementHandler, ElementOccurrence};
use std::ops::ControlFlow;
use tracing::debug;

const MESSAGE_ID: &str = "MessageID";
const RELATES_TO: &str = "RelatesTo";

/// WS-Addressing headers carried by every PAOS message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeader {
    message_id: Option<String>,
    relates_to: Option<String>,
}

impl MessageHeader {
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn relates_to(&self) -> Option<&str> {
        self.relates_to.as_deref()
    }

    fn handle_element(&mut self, element: &ElementOccurrence<'_>) {
        match element.local_name() {
            MESSAGE_ID => self.message_id = Some(element.text().to_string()),
            RELATES_TO => self.relates_to = Some(element.text().to_string()),
            _ => {}
        }
    }
}

/// State common to all decoded messages: type, raw bytes and headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBase {
    message_type: PaosType,
    raw: Box<[u8]>,
    header: MessageHeader,
}

impl MessageBase {
    pub fn message_type(&self) -> PaosType {
        self.message_type
    }

    /// The bytes the message was decoded from
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }
}

/// Read access shared by every decoded message
pub trait ProtocolMessage {
    fn base(&self) -> &MessageBase;

    fn message_type(&self) -> PaosType {
        self.base().message_type()
    }

    fn raw(&self) -> &[u8] {
        self.base().raw()
    }

    fn message_id(&self) -> Option<&str> {
        self.base().header().message_id()
    }

    fn relates_to(&self) -> Option<&str> {
        self.base().header().relates_to()
    }
}

/// Decoding state of one message type
pub trait MessageBody: Default {
    const TYPE: PaosType;

    /// The immutable message built once scanning is done
    type Output;

    /// Inspect one detected element; `Break` ends the pass early
    fn handle_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()>;

    /// Check mandatory fields and build the message
    fn finish(self, base: MessageBase) -> Result<Self::Output, DecodeError>;
}

/// Header collector and message body fed from the same pass
#[derive(Default)]
struct MessageDecoder<B> {
    header: MessageHeader,
    body: B,
}

impl<B: MessageBody> ElementHandler for MessageDecoder<B> {
    fn handle_found_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
        self.header.handle_element(element);
        self.body.handle_element(element)
    }
}

/// Reject input over the configured size before scanning it
pub(crate) fn check_size(
    message_type: PaosType,
    size: usize,
    options: &DecodeOptions,
) -> Result<(), DecodeError> {
    match options.max_message_size {
        Some(limit) if size > limit => Err(DecodeError::TooLarge {
            message_type,
            size,
            limit,
        }),
        _ => Ok(()),
    }
}

/// Decode `raw` as message body `B`, taking ownership of the bytes
pub fn decode<B: MessageBody>(
    raw: impl Into<Box<[u8]>>,
    options: &DecodeOptions,
) -> Result<B::Output, DecodeError> {
    let raw: Box<[u8]> = raw.into();
    check_size(B::TYPE, raw.len(), options)?;

    let mut decoder = MessageDecoder::<B>::default();
    let outcome = detect(&raw, options, &mut decoder).map_err(|source| {
        debug!(message_type = %B::TYPE, error = %source, "message rejected");
        DecodeError::Lexical {
            message_type: B::TYPE,
            source,
        }
    })?;
    debug!(
        message_type = %B::TYPE,
        elements = outcome.elements(),
        stopped = outcome.is_stopped(),
        "message scanned"
    );

    let MessageDecoder { header, body } = decoder;
    body.finish(MessageBase {
        message_type: B::TYPE,
        raw,
        header,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Body that counts `Item` elements and requires at least one
    #[derive(Default)]
    struct ItemCount {
        items: usize,
    }

    struct Items {
        base: MessageBase,
        items: usize,
    }

    impl ProtocolMessage for Items {
        fn base(&self) -> &MessageBase {
            &self.base
        }
    }

    impl MessageBody for ItemCount {
        const TYPE: PaosType = PaosType::Transmit;
        type Output = Items;

        fn handle_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
            if element.local_name() == "Item" {
                self.items += 1;
            }
            ControlFlow::Continue(())
        }

        fn finish(self, base: MessageBase) -> Result<Items, DecodeError> {
            if self.items == 0 {
                return Err(DecodeError::MissingField {
                    message_type: Self::TYPE,
                    field: "Item",
                });
            }
            Ok(Items {
                base,
                items: self.items,
            })
        }
    }

    const ITEMS: &str = r#"<Envelope>
  <Header>
    <wsa:MessageID>urn:uuid:1</wsa:MessageID>
    <wsa:RelatesTo>urn:uuid:0</wsa:RelatesTo>
  </Header>
  <Body><Item/><Item/></Body>
</Envelope>"#;

    #[test]
    fn test_decode_collects_headers_and_body() {
        let items = decode::<ItemCount>(ITEMS.as_bytes(), &DecodeOptions::default()).unwrap();
        assert_eq!(items.items, 2);
        assert_eq!(items.message_type(), PaosType::Transmit);
        assert_eq!(items.message_id(), Some("urn:uuid:1"));
        assert_eq!(items.relates_to(), Some("urn:uuid:0"));
        assert_eq!(items.raw(), ITEMS.as_bytes());
    }

    #[test]
    fn test_missing_headers_are_none() {
        let items = decode::<ItemCount>(&b"<Body><Item/></Body>"[..], &DecodeOptions::default()).unwrap();
        assert_eq!(items.message_id(), None);
        assert_eq!(items.relates_to(), None);
    }

    #[test]
    fn test_finish_failure_propagates() {
        let err = decode::<ItemCount>(&b"<Body/>"[..], &DecodeOptions::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            DecodeError::MissingField {
                message_type: PaosType::Transmit,
                field: "Item"
            }
        );
    }

    #[test]
    fn test_size_limit_checked_first() {
        let options = DecodeOptions::new().with_max_message_size(Some(8));
        let err = decode::<ItemCount>(&b"<Body><Item/></Body>"[..], &options)
            .err()
            .unwrap();
        assert_eq!(
            err,
            DecodeError::TooLarge {
                message_type: PaosType::Transmit,
                size: 20,
                limit: 8
            }
        );
    }

    #[test]
    fn test_lexical_failure_carries_type() {
        let err = decode::<ItemCount>(&b"<Body><Item></Body>"[..], &DecodeOptions::default())
            .err()
            .unwrap();
        assert!(err.is_lexical());
        assert_eq!(err.message_type(), PaosType::Transmit);
    }
}
