//! Decode limits
//!
//! Decoding is synchronous and bounded by message size, so the only knobs
//! are bounds checked before and during the single pass.

/// Default maximum element nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default maximum message size in bytes (1 MiB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1 << 20;

/// Limits applied to one decode pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Deepest allowed element nesting; deeper input is a lexical error
    pub max_depth: usize,
    /// Largest accepted message, `None` for no limit
    pub max_message_size: Option<usize>,
}

impl DecodeOptions {
    pub const fn new() -> Self {
        DecodeOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_message_size: Some(DEFAULT_MAX_MESSAGE_SIZE),
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_message_size(mut self, max_message_size: Option<usize>) -> Self {
        self.max_message_size = max_message_size;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
