//! Text and structured codecs used to build token segments.
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::{Map, Value};

/// Codec error.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Text encoding of byte buffers, used for each token segment.
pub trait TextCodec: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> String;

    /// Decodes the given text, failing on malformed input.
    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError>;
}

/// Structured (JSON-compatible) serialization of header and payload objects.
pub trait StructuredCodec: Send + Sync {
    fn serialize(&self, object: &Map<String, Value>) -> Result<Vec<u8>, CodecError>;

    /// Deserializes any value. The caller checks the value shape.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// Base64url without padding (RFC 4648 §5).
///
/// Decoding is strict: padding characters and non-canonical trailing bits
/// are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64UrlCodec;

impl TextCodec for Base64UrlCodec {
    fn encode(&self, bytes: &[u8]) -> String {
        URL_SAFE_NO_PAD.encode(bytes)
    }

    fn decode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        Ok(URL_SAFE_NO_PAD.decode(text)?)
    }
}

/// Compact JSON, keeping the insertion order of object members.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl StructuredCodec for JsonCodec {
    fn serialize(&self, object: &Map<String, Value>) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(object)?)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
