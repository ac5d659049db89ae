//! Zero-Copy Slice Reader
//!
//! Pull lexer over an in-memory message. Names and plain text are borrowed
//! from the input; only text with entity references is copied.
//!
//! The reader checks lexical well-formedness (tag syntax, attributes,
//! entities, legal characters, terminated markup). A DOCTYPE is accepted
//! once, before the first element; no other `<!` declaration is. Tag balance
//! is the detector's job, since it already keeps the stack of open elements.

use super::events::{EndTag, StartTag, XmlEvent};
use super::LexicalSource;
use crate::core::attributes::{parse_attributes, Attributes};
use crate::core::entities::{check_chars, decode_text};
use crate::core::error::{LexicalError, LexicalErrorKind};
use crate::core::scanner::{is_whitespace, Scanner};
use memchr::memmem;
use std::borrow::Cow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Zero-copy XML reader from a byte slice
pub struct SliceReader<'a> {
    scanner: Scanner<'a>,
    /// A start tag has been read; the prolog is over
    in_content: bool,
    doctype_seen: bool,
}

impl<'a> SliceReader<'a> {
    /// Create a reader, validating UTF-8 and skipping a leading BOM
    pub fn new(input: &'a [u8]) -> Result<Self, LexicalError> {
        let text = std::str::from_utf8(input).map_err(|e| {
            LexicalError::new(LexicalErrorKind::InvalidUtf8, e.valid_up_to())
        })?;
        let start = if input.starts_with(UTF8_BOM) {
            UTF8_BOM.len()
        } else {
            0
        };
        Ok(SliceReader {
            scanner: Scanner::new(text, start),
            in_content: false,
            doctype_seen: false,
        })
    }

    /// Get the next XML event, or None at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, LexicalError> {
        loop {
            let Some(b) = self.scanner.peek() else {
                return Ok(None);
            };
            if b != b'<' {
                return self.read_text().map(Some);
            }

            let start = self.scanner.position();
            if self.scanner.starts_with(b"<!--") {
                self.skip_past(start + 4, b"-->", "comment")?;
            } else if self.scanner.starts_with(b"<![CDATA[") {
                let content_start = start + 9;
                let content_end = self.skip_past(content_start, b"]]>", "CDATA section")?;
                if content_end > content_start {
                    let content = self.scanner.slice(content_start, content_end);
                    check_chars(content, content_start)?;
                    return Ok(Some(XmlEvent::Text(Cow::Borrowed(content))));
                }
            } else if self.scanner.starts_with(b"<!") {
                self.skip_doctype(start)?;
            } else if self.scanner.starts_with(b"<?") {
                self.skip_processing_instruction(start)?;
            } else if self.scanner.starts_with(b"</") {
                return self.read_end_tag(start).map(Some);
            } else {
                self.in_content = true;
                return self.read_start_tag(start).map(Some);
            }
        }
    }

    /// Read a start tag; the cursor is at '<'
    fn read_start_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, LexicalError> {
        self.scanner.advance(1);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| LexicalError::new(LexicalErrorKind::InvalidName, start + 1))?;
        let attributes: Attributes<'a> = parse_attributes(&mut self.scanner)?;

        let self_closing = match (self.scanner.peek(), self.scanner.peek_at(1)) {
            (Some(b'>'), _) => {
                self.scanner.advance(1);
                false
            }
            (Some(b'/'), Some(b'>')) => {
                self.scanner.advance(2);
                true
            }
            (Some(b'/'), None) | (None, _) => {
                return Err(LexicalError::new(
                    LexicalErrorKind::UnexpectedEof("start tag"),
                    self.scanner.position(),
                ))
            }
            _ => {
                return Err(LexicalError::new(
                    LexicalErrorKind::MalformedTag("expected '>' or '/>'"),
                    self.scanner.position(),
                ))
            }
        };

        Ok(XmlEvent::Start(StartTag {
            name,
            attributes,
            self_closing,
            offset: start,
        }))
    }

    /// Read an end tag; the cursor is at '</'
    fn read_end_tag(&mut self, start: usize) -> Result<XmlEvent<'a>, LexicalError> {
        self.scanner.advance(2);
        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| LexicalError::new(LexicalErrorKind::InvalidName, start + 2))?;
        self.scanner.skip_whitespace();

        match self.scanner.peek() {
            Some(b'>') => {
                self.scanner.advance(1);
                Ok(XmlEvent::End(EndTag { name, offset: start }))
            }
            Some(_) => Err(LexicalError::new(
                LexicalErrorKind::MalformedTag("expected '>' after end tag name"),
                self.scanner.position(),
            )),
            None => Err(LexicalError::new(
                LexicalErrorKind::UnexpectedEof("end tag"),
                self.scanner.position(),
            )),
        }
    }

    /// Read character data up to the next '<'
    fn read_text(&mut self) -> Result<XmlEvent<'a>, LexicalError> {
        let start = self.scanner.position();
        let end = self
            .scanner
            .find_tag_start()
            .unwrap_or(self.scanner.len());
        self.scanner.set_position(end);
        let raw = self.scanner.slice(start, end);
        if let Some(i) = memmem::find(raw.as_bytes(), b"]]>") {
            return Err(LexicalError::new(LexicalErrorKind::CdataEndInText, start + i));
        }
        let text = decode_text(raw, start)?;
        Ok(XmlEvent::Text(text))
    }

    /// Skip `<?target ...?>`, including the XML declaration
    fn skip_processing_instruction(&mut self, start: usize) -> Result<(), LexicalError> {
        self.scanner.set_position(start + 2);
        if self.scanner.read_name().is_none() {
            return Err(LexicalError::new(LexicalErrorKind::InvalidName, start + 2));
        }
        let after_target = self.scanner.position();
        self.skip_past(after_target, b"?>", "processing instruction")?;
        Ok(())
    }

    /// Skip `<!DOCTYPE ...>` including an internal subset in brackets
    fn skip_doctype(&mut self, start: usize) -> Result<(), LexicalError> {
        const KEYWORD: &[u8] = b"<!DOCTYPE";
        let is_doctype = self.scanner.starts_with(KEYWORD)
            && self.scanner.peek_at(KEYWORD.len()).is_some_and(is_whitespace);
        if !is_doctype {
            return Err(LexicalError::new(
                LexicalErrorKind::MalformedTag("unexpected markup declaration"),
                start,
            ));
        }
        if self.in_content || self.doctype_seen {
            return Err(LexicalError::new(
                LexicalErrorKind::MalformedTag("DOCTYPE is only allowed once, before the root element"),
                start,
            ));
        }
        self.doctype_seen = true;
        self.scanner.set_position(start + KEYWORD.len());
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;

        while let Some(c) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(c),
                (None, b'[') => depth += 1,
                (None, b']') => depth = depth.saturating_sub(1),
                (None, b'>') if depth == 0 => return Ok(()),
                _ => {}
            }
        }

        Err(LexicalError::new(
            LexicalErrorKind::UnexpectedEof("markup declaration"),
            self.scanner.position(),
        ))
    }

    /// Move past `terminator`, searching from `from`; returns where it starts
    fn skip_past(
        &mut self,
        from: usize,
        terminator: &[u8],
        context: &'static str,
    ) -> Result<usize, LexicalError> {
        self.scanner.set_position(from);
        match self.scanner.find_sequence(terminator) {
            Some(pos) => {
                self.scanner.set_position(pos + terminator.len());
                Ok(pos)
            }
            None => {
                let end = self.scanner.len();
                self.scanner.set_position(end);
                Err(LexicalError::new(LexicalErrorKind::UnexpectedEof(context), end))
            }
        }
    }
}

impl<'a> LexicalSource<'a> for SliceReader<'a> {
    fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, LexicalError> {
        SliceReader::next_event(self)
    }

    fn position(&self) -> usize {
        self.scanner.position()
    }
}
