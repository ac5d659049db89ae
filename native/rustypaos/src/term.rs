//! Elixir Term Conversion Utilities
//!
//! Converts decoded messages and failures to Elixir terms.

use rustler::{Atom, Encoder, Env, NewBinary, NifResult, Term};
use crate::core::error::LexicalError;
use crate::message::{DecodeError, Message, PaosResult, PaosType, ProtocolMessage};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    nil,

    // map keys
    message_type,
    message_id,
    relates_to,
    slot_handle,
    result,
    major,
    minor,
    message,

    // message types
    start_paos,
    start_paos_response,
    initialize_framework,
    did_list,
    did_authenticate,
    transmit,
    disconnect,
    unknown,

    // failure kinds
    lexical_error,
    missing_field,
    too_large,
    unsupported_message,
}

/// Atom naming a message type, e.g. `:disconnect`
pub fn paos_type_to_atom(message_type: PaosType) -> Atom {
    match message_type {
        PaosType::StartPaos => start_paos(),
        PaosType::StartPaosResponse => start_paos_response(),
        PaosType::InitializeFramework => initialize_framework(),
        PaosType::DidList => did_list(),
        PaosType::DidAuthenticate => did_authenticate(),
        PaosType::Transmit => transmit(),
        PaosType::Disconnect => disconnect(),
        PaosType::Unknown => unknown(),
    }
}

fn error_kind_to_atom(err: &DecodeError) -> Atom {
    match err {
        DecodeError::Lexical { .. } => lexical_error(),
        DecodeError::MissingField { .. } => missing_field(),
        DecodeError::TooLarge { .. } => too_large(),
        DecodeError::Unsupported { .. } => unsupported_message(),
    }
}

/// `{:error, {kind, message_type, description}}`
pub fn decode_error_to_term<'a>(env: Env<'a>, err: &DecodeError) -> Term<'a> {
    let reason = (
        error_kind_to_atom(err),
        paos_type_to_atom(err.message_type()),
        str_to_binary(env, &err.to_string()),
    );
    (error(), reason).encode(env)
}

/// `{:error, {:lexical_error, :unknown, description}}`
pub fn lexical_error_to_term<'a>(env: Env<'a>, err: &LexicalError) -> Term<'a> {
    let reason = (lexical_error(), unknown(), str_to_binary(env, &err.to_string()));
    (error(), reason).encode(env)
}

/// Binary for `Some`, `nil` for `None`
pub fn optional_str_to_term<'a>(env: Env<'a>, value: Option<&str>) -> Term<'a> {
    match value {
        Some(s) => str_to_binary(env, s),
        None => nil().encode(env),
    }
}

/// `%{major: _, minor: _, message: _}`
pub fn paos_result_to_term<'a>(env: Env<'a>, paos_result: &PaosResult) -> NifResult<Term<'a>> {
    let pairs = [
        (major().encode(env), str_to_binary(env, paos_result.major())),
        (minor().encode(env), optional_str_to_term(env, paos_result.minor())),
        (message().encode(env), optional_str_to_term(env, paos_result.message())),
    ];
    Term::map_from_pairs(env, &pairs)
}

/// Flat map of a decoded message
///
/// Always has `:message_type`, `:message_id` and `:relates_to`; the
/// type-specific fields follow.
pub fn message_to_term<'a>(env: Env<'a>, msg: &Message) -> NifResult<Term<'a>> {
    let mut pairs = vec![
        (message_type().encode(env), paos_type_to_atom(msg.message_type()).encode(env)),
        (message_id().encode(env), optional_str_to_term(env, msg.message_id())),
        (relates_to().encode(env), optional_str_to_term(env, msg.relates_to())),
    ];
    match msg {
        Message::Disconnect(d) => {
            pairs.push((slot_handle().encode(env), str_to_binary(env, d.slot_handle())));
        }
        Message::StartPaosResponse(r) => {
            pairs.push((result().encode(env), paos_result_to_term(env, r.result())?));
        }
    }
    Term::map_from_pairs(env, &pairs)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    bytes_to_binary(env, s.as_bytes())
}

/// Create a binary from bytes
pub fn bytes_to_binary<'a>(env: Env<'a>, bytes: &[u8]) -> Term<'a> {
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
