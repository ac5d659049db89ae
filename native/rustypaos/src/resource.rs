//! ResourceArc Wrappers
//!
//! Decoded messages kept on the Rust side so accessors need no re-decode.

use crate::message::Message;
use rustler::ResourceArc;

/// Wrapper for a decoded Message that can be stored in a ResourceArc
///
/// Messages are immutable once decoded, so no lock is needed.
pub struct MessageResource {
    pub message: Message,
}

impl MessageResource {
    pub fn new(message: Message) -> Self {
        MessageResource { message }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for MessageResource {}

/// Type alias for the ResourceArc
pub type MessageRef = ResourceArc<MessageResource>;
