//! Signature functions bound to a profile's key material.
use crate::algorithm::Algorithm;

/// Dispatches on a hash strength, binding the matching `sha2` digest type
/// to `$d` inside `$body`.
macro_rules! with_digest {
    ($hash:expr, $d:ident => $body:expr) => {
        match $hash {
            $crate::algorithm::HashStrength::Sha256 => {
                type $d = sha2::Sha256;
                $body
            }
            $crate::algorithm::HashStrength::Sha384 => {
                type $d = sha2::Sha384;
                $body
            }
            $crate::algorithm::HashStrength::Sha512 => {
                type $d = sha2::Sha512;
                $body
            }
        }
    };
}

mod ecdsa;
mod hmac;
mod rsa;

pub use self::ecdsa::EcdsaSigner;
pub use self::hmac::HmacSigner;
pub use self::rsa::RsaSigner;

/// Signing error.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// The profile only holds a verifying key.
    #[error("missing signing key")]
    MissingSigningKey,

    #[error("invalid HMAC key length")]
    InvalidKeyLength,

    #[error(transparent)]
    Crypto(#[from] signature::Error),
}

/// Signature capability of a profile.
///
/// A signer is bound to one algorithm and one key. Verification returns a
/// plain boolean: a signature that cannot even be parsed simply does not
/// verify.
pub trait Signer: Send + Sync {
    /// Algorithm implemented by this signer.
    fn algorithm(&self) -> Algorithm;

    /// Signs the given bytes.
    fn sign(&self, signing_bytes: &[u8]) -> Result<Vec<u8>, SignatureError>;

    /// Checks `signature` against the given bytes.
    fn verify(&self, signing_bytes: &[u8], signature: &[u8]) -> bool;
}

impl<S: ?Sized + Signer> Signer for Box<S> {
    fn algorithm(&self) -> Algorithm {
        S::algorithm(self)
    }

    fn sign(&self, signing_bytes: &[u8]) -> Result<Vec<u8>, SignatureError> {
        S::sign(self, signing_bytes)
    }

    fn verify(&self, signing_bytes: &[u8], signature: &[u8]) -> bool {
        S::verify(self, signing_bytes, signature)
    }
}
