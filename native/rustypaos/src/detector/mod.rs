//! Element Detector
//!
//! Single forward pass over lexical events that reports every element to an
//! [`ElementHandler`] once the element closes:
//!
//! ```text
//! bytes ---> SliceReader ---> ElementDetector ---> ElementHandler
//!            (events)         (stack + text)       (per message type)
//! ```
//!
//! The detector keeps a stack of open elements, accumulates each element's
//! direct character data and checks tag balance. It knows nothing about
//! message semantics; no tree is built and nothing is retained after an
//! element has been reported.

mod occurrence;

pub use occurrence::ElementOccurrence;

use crate::config::DecodeOptions;
use crate::core::error::{LexicalError, LexicalErrorKind};
use crate::core::scanner::is_whitespace;
use crate::reader::events::XmlEvent;
use crate::reader::slice::SliceReader;
use crate::reader::LexicalSource;
use occurrence::OpenElement;
use std::ops::ControlFlow;
use tracing::trace;

/// Receives each detected element
pub trait ElementHandler {
    /// Called once per closed element, innermost first
    ///
    /// Return `ControlFlow::Break(())` to stop scanning. Stopping is not an
    /// error; the rest of the input is neither scanned nor validated.
    fn handle_found_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()>;
}

impl<F> ElementHandler for F
where
    F: FnMut(&ElementOccurrence<'_>) -> ControlFlow<()>,
{
    fn handle_found_element(&mut self, element: &ElementOccurrence<'_>) -> ControlFlow<()> {
        self(element)
    }
}

/// How a successful pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectOutcome {
    /// The whole document was scanned
    Completed { elements: usize },
    /// The handler asked to stop after `elements` occurrences
    Stopped { elements: usize },
}

impl DetectOutcome {
    pub fn is_stopped(&self) -> bool {
        matches!(self, DetectOutcome::Stopped { .. })
    }

    /// Number of occurrences reported to the handler
    pub fn elements(&self) -> usize {
        match *self {
            DetectOutcome::Completed { elements } | DetectOutcome::Stopped { elements } => elements,
        }
    }
}

/// Push-style element scanner
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementDetector {
    options: DecodeOptions,
}

impl ElementDetector {
    pub fn new(options: DecodeOptions) -> Self {
        ElementDetector { options }
    }

    /// Scan every event of `source`, reporting closed elements to `handler`
    pub fn run<'a, S, H>(&self, source: &mut S, handler: &mut H) -> Result<DetectOutcome, LexicalError>
    where
        S: LexicalSource<'a> + ?Sized,
        H: ElementHandler + ?Sized,
    {
        let mut stack: Vec<OpenElement<'a>> = Vec::with_capacity(16);
        let mut root_seen = false;
        let mut elements = 0usize;

        while let Some(event) = source.next_event()? {
            match event {
                XmlEvent::Start(tag) => {
                    if stack.is_empty() && root_seen {
                        return Err(LexicalError::new(LexicalErrorKind::MultipleRoots, tag.offset));
                    }
                    if stack.len() >= self.options.max_depth {
                        return Err(LexicalError::new(
                            LexicalErrorKind::DepthLimitExceeded(self.options.max_depth),
                            tag.offset,
                        ));
                    }
                    root_seen = true;

                    if tag.self_closing {
                        elements += 1;
                        let occurrence = ElementOccurrence::new(tag.name, "", &tag.attributes, &stack);
                        trace!(name = tag.name, depth = stack.len(), "element detected");
                        if handler.handle_found_element(&occurrence).is_break() {
                            return Ok(DetectOutcome::Stopped { elements });
                        }
                    } else {
                        stack.push(OpenElement::new(tag.name, tag.attributes));
                    }
                }

                XmlEvent::Text(text) => match stack.last_mut() {
                    Some(open) => open.push_text(text),
                    None if text.bytes().all(is_whitespace) => {}
                    None => {
                        return Err(LexicalError::new(
                            LexicalErrorKind::TextOutsideRoot,
                            source.position(),
                        ))
                    }
                },

                XmlEvent::End(tag) => {
                    let Some(open) = stack.pop() else {
                        return Err(LexicalError::new(
                            LexicalErrorKind::UnexpectedEndTag(tag.name.to_string()),
                            tag.offset,
                        ));
                    };
                    if open.name != tag.name {
                        return Err(LexicalError::new(
                            LexicalErrorKind::MismatchedEndTag {
                                expected: open.name.to_string(),
                                found: tag.name.to_string(),
                            },
                            tag.offset,
                        ));
                    }

                    elements += 1;
                    let occurrence =
                        ElementOccurrence::new(open.name, &open.text, &open.attributes, &stack);
                    trace!(name = open.name, depth = stack.len(), "element detected");
                    if handler.handle_found_element(&occurrence).is_break() {
                        return Ok(DetectOutcome::Stopped { elements });
                    }
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(LexicalError::new(
                LexicalErrorKind::UnclosedElement(open.name.to_string()),
                source.position(),
            ));
        }
        if !root_seen {
            return Err(LexicalError::new(
                LexicalErrorKind::NoRootElement,
                source.position(),
            ));
        }

        Ok(DetectOutcome::Completed { elements })
    }
}

/// Run a detection pass over raw message bytes
pub fn detect<H>(input: &[u8], options: &DecodeOptions, handler: &mut H) -> Result<DetectOutcome, LexicalError>
where
    H: ElementHandler + ?Sized,
{
    let mut reader = SliceReader::new(input)?;
    ElementDetector::new(*options).run(&mut reader, handler)
}
