//! Frame codec.
//!
//! A frame is the bincode encoding of one `Request` or `Response`. Framing on
//! the byte stream is left to the transport.

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("failed to decode frame: {0}")]
    Decode(String),
}

pub fn encode<T: Serialize>(message: &T) -> Result<Bytes, CodecError> {
    bincode::serialize(message)
        .map(Bytes::from)
        .map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(frame: &[u8]) -> Result<T, CodecError> {
    bincode::deserialize(frame).map_err(|e| CodecError::Decode(e.to_string()))
}
