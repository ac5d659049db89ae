//! XML Reader Module
//!
//! - `LexicalSource`: the event contract the element detector consumes
//! - `SliceReader`: zero-copy pull lexer over an in-memory message
//! - Events: start tag, end tag and text

pub mod events;
pub mod slice;

use crate::core::error::LexicalError;
use events::XmlEvent;

/// A source of lexical XML events in document order
///
/// Implementations either yield the next event, signal the end of input
/// with `Ok(None)`, or fail with a lexical error. After an error the source
/// is not polled again.
pub trait LexicalSource<'a> {
    fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, LexicalError>;

    /// Byte offset just past the last event returned
    fn position(&self) -> usize;
}
