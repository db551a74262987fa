//! Error types for `ssi-jwt-profiles`.
use crate::codec::CodecError;
use crate::key::KeyError;
use crate::signer::SignatureError;

/// Error type for the token service.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A profile with this name is already registered.
    #[error("profile `{0}` already exists")]
    DuplicateProfile(String),

    /// No profile with this name is registered.
    #[error("profile `{0}` does not exist")]
    ProfileNotFound(String),

    /// The token to decode is malformed.
    #[error("malformed token: {0}")]
    MalformedToken(#[from] MalformedToken),

    /// Key material could not be used for the profile.
    #[error("invalid key material: {0}")]
    Key(#[from] KeyError),

    /// The payload to encode is not a JSON object.
    #[error("payload must serialize to a JSON object")]
    InvalidPayload,

    /// The header parameters to encode are not a JSON object.
    #[error("header parameters must serialize to a JSON object")]
    InvalidHeader,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Service configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),
}

/// Reason a token was rejected as malformed.
#[derive(Debug, thiserror::Error)]
pub enum MalformedToken {
    #[error("expected 3 segments, found {0}")]
    SegmentCount(usize),

    #[error("invalid header: {0}")]
    Header(#[source] CodecError),

    #[error("invalid payload: {0}")]
    Payload(#[source] CodecError),

    #[error("header is not a JSON object")]
    HeaderNotObject,

    #[error("header `typ` is not \"JWT\"")]
    InvalidType,

    #[error("header `alg` is missing or not a string")]
    MissingAlgorithm,

    #[error("payload is not a JSON object")]
    PayloadNotObject,
}
