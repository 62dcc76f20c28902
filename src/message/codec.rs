//! Payload codecs for typed data slots.

use std::error::Error;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Error type for codec operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Encoding a value to its transport representation failed.
    Encode(String),
    /// Decoding a transport representation back to the value failed.
    Decode(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Encode(msg) => write!(f, "encode failed: {}", msg),
            CodecError::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl Error for CodecError {}

/// Strategy for converting a value of type `T` to and from the
/// transport-neutral representation carried inside a message.
///
/// Every [`DataKey`](super::DataKey) owns exactly one codec; the key's
/// typed `set`/`get` always run through it, so values written via a key
/// decode via the same key without runtime type surprises.
pub trait DataCodec<T>: Send + Sync {
    /// Encode a value into its byte representation.
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    /// Decode a byte representation back into a value.
    fn decode(&self, raw: &[u8]) -> Result<T, CodecError>;
}

/// JSON codec backed by serde_json.
///
/// The default choice: payloads stay human-readable, which makes message
/// snapshots in logs directly inspectable.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        JsonCodec {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> DataCodec<T> for JsonCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(raw).map_err(|e| CodecError::Decode(e.to_string()))
    }
}

/// Compact binary codec backed by bitcode.
///
/// Useful for large payloads (for example full scan configurations) where
/// JSON overhead matters. Snapshots render these payloads as base64.
pub struct BitcodeCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> BitcodeCodec<T> {
    pub fn new() -> Self {
        BitcodeCodec {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for BitcodeCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> DataCodec<T> for BitcodeCodec<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        bitcode::serialize(value).map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, raw: &[u8]) -> Result<T, CodecError> {
        bitcode::deserialize(raw).map_err(|e| CodecError::Decode(e.to_string()))
    }
}
