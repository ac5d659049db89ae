//! Core XML lexing primitives
//!
//! Building blocks shared by the reader:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: entity and character reference decoding with Cow (zero-copy when possible)
//! - Attributes: attribute parsing and lookup by qualified or local name
//! - Error: lexical failures with the byte offset they occurred at

pub mod attributes;
pub mod entities;
pub mod error;
pub mod scanner;
