//! Binary envelope codec
//!
//! MessagePack encoding of [`Envelope`] frames and bare payload values.
//! Encoding is pure, synchronous, and deterministic; decode is the left
//! inverse of encode for every supported value shape. Decode failures
//! are local to the frame in question and never fatal.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::types::Envelope;
use crate::value::Value;
use crate::MAX_FRAME_SIZE;

/// Encode an envelope into wire bytes
///
/// Fails with [`Error::FrameTooLarge`] when the encoded frame would
/// exceed the transport's per-frame ceiling.
pub fn encode(envelope: &Envelope) -> Result<Bytes> {
    let buf = rmp_serde::to_vec_named(envelope)?;
    if buf.len() > MAX_FRAME_SIZE {
        return Err(Error::FrameTooLarge(buf.len()));
    }
    Ok(Bytes::from(buf))
}

/// Decode wire bytes into an envelope
pub fn decode(bytes: &[u8]) -> Result<Envelope> {
    if bytes.is_empty() {
        return Err(Error::MalformedFrame("empty frame".to_string()));
    }
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Encode a bare payload value, without an envelope
pub fn encode_value(value: &Value) -> Result<Bytes> {
    Ok(Bytes::from(rmp_serde::to_vec_named(value)?))
}

/// Decode a bare payload value
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    if bytes.is_empty() {
        return Err(Error::MalformedFrame("empty payload".to_string()));
    }
    Ok(rmp_serde::from_slice(bytes)?)
}
