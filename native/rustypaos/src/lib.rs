//! RustyPAOS - Fast decoding of inbound PAOS messages
//!
//! A PAOS message is a SOAP envelope whose body names the message type.
//! Decoding is a single forward pass:
//!
//! ```text
//! bytes ---> reader::SliceReader ---> detector::ElementDetector ---> message::MessageBody
//!            (lexical events)         (closed elements + context)    (typed fields)
//! ```
//!
//! Rust callers use [`message`] directly; Elixir callers go through the
//! NIFs below.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod batch;
pub mod config;
pub mod core;
pub mod detector;
pub mod message;
pub mod reader;
mod resource;
mod term;

pub use config::DecodeOptions;
pub use message::{
    detect_type, DecodeError, Disconnect, Message, PaosResult, PaosType, ProtocolMessage,
    StartPaosResponse,
};

use resource::{MessageRef, MessageResource};
use term::{decode_error_to_term, lexical_error_to_term, message_to_term, optional_str_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn options_from(max_depth: Option<usize>, max_message_size: Option<usize>) -> DecodeOptions {
    let mut options = DecodeOptions::default();
    if let Some(depth) = max_depth {
        options = options.with_max_depth(depth);
    }
    if max_message_size.is_some() {
        options = options.with_max_message_size(max_message_size);
    }
    options
}

// ============================================================================
// Detection
// ============================================================================

/// Classify a message by its first body element
/// Returns {:ok, type} or {:error, {:lexical_error, :unknown, reason}}
#[rustler::nif(name = "detect_type")]
fn detect_type_nif<'a>(env: Env<'a>, input: Binary<'a>) -> Term<'a> {
    match detect_type(input.as_slice()) {
        Ok(found) => (term::ok(), term::paos_type_to_atom(found)).encode(env),
        Err(e) => lexical_error_to_term(env, &e),
    }
}

// ============================================================================
// Decoding
// ============================================================================

/// Decode straight to a map (no resource kept)
/// Returns {:ok, map} or {:error, {kind, type, reason}}
#[rustler::nif]
fn decode<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    max_depth: Option<usize>,
    max_message_size: Option<usize>,
) -> NifResult<Term<'a>> {
    let options = options_from(max_depth, max_message_size);
    match Message::decode(input.as_slice(), &options) {
        Ok(msg) => Ok((term::ok(), message_to_term(env, &msg)?).encode(env)),
        Err(e) => Ok(decode_error_to_term(env, &e)),
    }
}

/// Decode into a resource for repeated accessor calls
/// Returns {:ok, ref} or {:error, {kind, type, reason}}
#[rustler::nif]
fn parse<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    max_depth: Option<usize>,
    max_message_size: Option<usize>,
) -> Term<'a> {
    let options = options_from(max_depth, max_message_size);
    match Message::decode(input.as_slice(), &options) {
        Ok(msg) => {
            let arc = ResourceArc::new(MessageResource::new(msg));
            (term::ok(), arc).encode(env)
        }
        Err(e) => decode_error_to_term(env, &e),
    }
}

// ============================================================================
// Accessors
// ============================================================================

#[rustler::nif]
fn message_type<'a>(env: Env<'a>, msg_ref: MessageRef) -> Term<'a> {
    term::paos_type_to_atom(msg_ref.message.message_type()).encode(env)
}

#[rustler::nif]
fn message_id<'a>(env: Env<'a>, msg_ref: MessageRef) -> Term<'a> {
    optional_str_to_term(env, msg_ref.message.message_id())
}

#[rustler::nif]
fn relates_to<'a>(env: Env<'a>, msg_ref: MessageRef) -> Term<'a> {
    optional_str_to_term(env, msg_ref.message.relates_to())
}

/// Slot handle of a Disconnect, nil for other types
#[rustler::nif]
fn slot_handle<'a>(env: Env<'a>, msg_ref: MessageRef) -> Term<'a> {
    let slot = msg_ref.message.as_disconnect().map(Disconnect::slot_handle);
    optional_str_to_term(env, slot)
}

/// Result map of a StartPAOSResponse, nil for other types
#[rustler::nif]
fn paos_result<'a>(env: Env<'a>, msg_ref: MessageRef) -> NifResult<Term<'a>> {
    match msg_ref.message.as_start_paos_response() {
        Some(response) => term::paos_result_to_term(env, response.result()),
        None => Ok(term::nil().encode(env)),
    }
}

/// Original message bytes
#[rustler::nif]
fn raw<'a>(env: Env<'a>, msg_ref: MessageRef) -> Term<'a> {
    term::bytes_to_binary(env, msg_ref.message.raw())
}

#[rustler::nif]
fn to_map<'a>(env: Env<'a>, msg_ref: MessageRef) -> NifResult<Term<'a>> {
    message_to_term(env, &msg_ref.message)
}

// ============================================================================
// Batch Decoding
// ============================================================================

/// Decode many messages in parallel, each with the same limits
/// Returns a list of {:ok, map} | {:error, reason} in input order
#[rustler::nif(schedule = "DirtyCpu")]
fn decode_batch<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    max_depth: Option<usize>,
    max_message_size: Option<usize>,
) -> NifResult<Term<'a>> {
    let options = options_from(max_depth, max_message_size);
    let owned: Vec<Vec<u8>> = inputs.iter().map(|b| b.as_slice().to_vec()).collect();
    let results = batch::decode_batch(owned, &options);

    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        let item = match result {
            Ok(msg) => (term::ok(), message_to_term(env, &msg)?).encode(env),
            Err(e) => decode_error_to_term(env, &e),
        };
        list = list.list_prepend(item);
    }
    Ok(list)
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyPaos.Native");
