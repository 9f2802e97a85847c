//! Length-prefixed CBOR framing for out-of-process workers.
//!
//! In-process dispatch ([`crate::InProcessPool`]) never touches this module
//! — it exists so a future out-of-process worker can speak the same
//! [`crate::WorkerRequest`]/[`crate::WorkerReply`] contract over a byte
//! stream, using the same `len(u32 BE) + body` framing the orchestrator's
//! other wire protocols use.

use crate::{WorkerReply, WorkerRequest};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Framing/codec failures.
#[derive(Debug, Error)]
pub enum WireError {
    /// The buffer does not yet contain a full length-prefixed frame.
    #[error("incomplete frame")]
    Incomplete,
    /// CBOR encode/decode failed.
    #[error("cbor error: {0}")]
    Cbor(String),
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    let mut body = Vec::new();
    ciborium::into_writer(value, &mut body).map_err(|e| WireError::Cbor(e.to_string()))?;
    let mut out = Vec::with_capacity(4 + body.len());
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

fn decode<T: DeserializeOwned>(stream: &[u8]) -> Result<(T, usize), WireError> {
    if stream.len() < 4 {
        return Err(WireError::Incomplete);
    }
    let len = u32::from_be_bytes([stream[0], stream[1], stream[2], stream[3]]) as usize;
    if stream.len() < 4 + len {
        return Err(WireError::Incomplete);
    }
    let value = ciborium::from_reader(&stream[4..4 + len]).map_err(|e| WireError::Cbor(e.to_string()))?;
    Ok((value, 4 + len))
}

/// Encodes a [`WorkerRequest`] as a length-prefixed CBOR frame.
///
/// # Errors
/// Returns [`WireError::Cbor`] if encoding fails.
pub fn encode_request(request: &WorkerRequest) -> Result<Vec<u8>, WireError> {
    encode(request)
}

/// Decodes a [`WorkerRequest`] from the front of `stream`, returning the
/// value and the number of bytes consumed.
///
/// # Errors
/// Returns [`WireError::Incomplete`] if `stream` does not yet hold a full
/// frame, or [`WireError::Cbor`] if the frame fails to decode.
pub fn decode_request(stream: &[u8]) -> Result<(WorkerRequest, usize), WireError> {
    decode(stream)
}

/// Encodes a [`WorkerReply`] as a length-prefixed CBOR frame.
///
/// # Errors
/// Returns [`WireError::Cbor`] if encoding fails.
pub fn encode_reply(reply: &WorkerReply) -> Result<Vec<u8>, WireError> {
    encode(reply)
}

/// Decodes a [`WorkerReply`] from the front of `stream`, returning the value
/// and the number of bytes consumed.
///
/// # Errors
/// Returns [`WireError::Incomplete`] if `stream` does not yet hold a full
/// frame, or [`WireError::Cbor`] if the frame fails to decode.
pub fn decode_reply(stream: &[u8]) -> Result<(WorkerReply, usize), WireError> {
    decode(stream)
}
