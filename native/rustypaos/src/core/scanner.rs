//! Byte cursor for PAOS message scanning using memchr
//!
//! The lexer validates UTF-8 once up front, so every position the cursor
//! stops at (ASCII delimiters, ends of names) is a char boundary and slices
//! can be handed out as `&str` without re-validation.

use memchr::{memchr, memmem};

/// Cursor over a validated UTF-8 message
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner positioned at `start`
    #[inline]
    pub fn new(input: &'a str, start: usize) -> Self {
        Scanner { input, pos: start }
    }

    /// Current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Total input length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Slice of the input between two offsets
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input.as_bytes()[self.pos..].starts_with(needle)
    }

    /// Skip XML whitespace, returning true if any was consumed
    #[inline]
    pub fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_whitespace(bytes[self.pos]) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Find the next '<' at or after the cursor
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', &self.input.as_bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Find a terminator sequence such as `-->` or `]]>`
    #[inline]
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.input.as_bytes()[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Read an XML name at the cursor
    pub fn read_name(&mut self) -> Option<&'a str> {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        if !bytes.get(start).copied().is_some_and(is_name_start_char) {
            return None;
        }
        self.pos += 1;
        while self.pos < bytes.len() && is_name_char(bytes[self.pos]) {
            self.pos += 1;
        }
        Some(&self.input[start..self.pos])
    }
}

/// Check if byte is XML whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Check if byte is valid XML name start character
/// Non-ASCII bytes are accepted whole so names never split a UTF-8 sequence
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}
