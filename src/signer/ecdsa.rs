use signature::{Signer as _, Verifier as _};

use super::{SignatureError, Signer};
use crate::algorithm::{Algorithm, AlgorithmFamily, HashStrength};
use crate::key::{EcdsaKeyPair, KeyError};

/// ES256, ES384 or ES512 signer.
///
/// Signatures use the IEEE P1363 encoding (`r || s`) required by JWA.
#[derive(Debug)]
pub struct EcdsaSigner {
    key: EcdsaKeyPair,
}

impl EcdsaSigner {
    /// Creates a new signer, checking that the key curve is the one paired
    /// with `hash`.
    pub fn new(hash: HashStrength, key: EcdsaKeyPair) -> Result<Self, KeyError> {
        let curve = key.curve();
        if curve.hash() != hash {
            return Err(KeyError::CurveMismatch { curve, hash });
        }
        Ok(Self { key })
    }
}

impl Signer for EcdsaSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::from_parts(AlgorithmFamily::Ecdsa, self.key.curve().hash())
    }

    fn sign(&self, signing_bytes: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let signature = match &self.key {
            EcdsaKeyPair::P256 { signing, .. } => {
                let key = signing.as_ref().ok_or(SignatureError::MissingSigningKey)?;
                let sig: p256::ecdsa::Signature = key.try_sign(signing_bytes)?;
                sig.to_bytes().to_vec()
            }
            EcdsaKeyPair::P384 { signing, .. } => {
                let key = signing.as_ref().ok_or(SignatureError::MissingSigningKey)?;
                let sig: p384::ecdsa::Signature = key.try_sign(signing_bytes)?;
                sig.to_bytes().to_vec()
            }
            EcdsaKeyPair::P521 { signing, .. } => {
                let key = signing.as_ref().ok_or(SignatureError::MissingSigningKey)?;
                let sig: p521::ecdsa::Signature = key.try_sign(signing_bytes)?;
                sig.to_bytes().to_vec()
            }
        };
        Ok(signature)
    }

    fn verify(&self, signing_bytes: &[u8], signature: &[u8]) -> bool {
        match &self.key {
            EcdsaKeyPair::P256 { verifying, .. } => p256::ecdsa::Signature::from_slice(signature)
                .map(|sig| verifying.verify(signing_bytes, &sig).is_ok())
                .unwrap_or(false),
            EcdsaKeyPair::P384 { verifying, .. } => p384::ecdsa::Signature::from_slice(signature)
                .map(|sig| verifying.verify(signing_bytes, &sig).is_ok())
                .unwrap_or(false),
            EcdsaKeyPair::P521 { verifying, .. } => p521::ecdsa::Signature::from_slice(signature)
                .map(|sig| verifying.verify(signing_bytes, &sig).is_ok())
                .unwrap_or(false),
        }
    }
}
