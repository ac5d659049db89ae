//! Parallel batch decoding
//!
//! Uses Rayon to decode independent messages concurrently. Each input is
//! decoded on its own; one failure does not affect the others.

use crate::config::DecodeOptions;
use crate::core::error::LexicalError;
use crate::message::{detect_type_with, DecodeError, Message, PaosType};
use rayon::prelude::*;

/// Decode every input in parallel, results in input order
pub fn decode_batch(inputs: Vec<Vec<u8>>, options: &DecodeOptions) -> Vec<Result<Message, DecodeError>> {
    inputs
        .into_par_iter()
        .map(|raw| Message::decode(raw, options))
        .collect()
}

/// Classify every input in parallel, results in input order
pub fn detect_batch(inputs: &[&[u8]], options: &DecodeOptions) -> Vec<Result<PaosType, LexicalError>> {
    inputs
        .par_iter()
        .map(|raw| detect_type_with(raw, options))
        .collect()
}
