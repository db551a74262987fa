use rand::rngs::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding, Signer as _, Verifier};
use rsa::{pkcs1v15, pss};

use super::{SignatureError, Signer};
use crate::algorithm::{Algorithm, AlgorithmFamily, HashStrength, RsaPadding};
use crate::key::RsaKeyPair;

/// RS256/384/512 (PKCS#1 v1.5) or PS256/384/512 (PSS-MGF1) signer.
#[derive(Debug, Clone)]
pub struct RsaSigner {
    hash: HashStrength,
    padding: RsaPadding,
    key: RsaKeyPair,
}

impl RsaSigner {
    pub fn new(hash: HashStrength, padding: RsaPadding, key: RsaKeyPair) -> Self {
        Self { hash, padding, key }
    }
}

impl Signer for RsaSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::from_parts(AlgorithmFamily::Rsa(self.padding), self.hash)
    }

    fn sign(&self, signing_bytes: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let private_key = self
            .key
            .private_key()
            .ok_or(SignatureError::MissingSigningKey)?
            .clone();
        match self.padding {
            RsaPadding::Pkcs1v15 => with_digest!(self.hash, D => {
                let key = pkcs1v15::SigningKey::<D>::new(private_key);
                Ok(key.try_sign(signing_bytes)?.to_vec())
            }),
            RsaPadding::PssMgf1 => with_digest!(self.hash, D => {
                let key = pss::BlindedSigningKey::<D>::new(private_key);
                Ok(key.try_sign_with_rng(&mut OsRng, signing_bytes)?.to_vec())
            }),
        }
    }

    fn verify(&self, signing_bytes: &[u8], signature: &[u8]) -> bool {
        let public_key = self.key.public_key().clone();
        match self.padding {
            RsaPadding::Pkcs1v15 => with_digest!(self.hash, D => {
                let key = pkcs1v15::VerifyingKey::<D>::new(public_key);
                pkcs1v15::Signature::try_from(signature)
                    .map(|signature| key.verify(signing_bytes, &signature).is_ok())
                    .unwrap_or(false)
            }),
            RsaPadding::PssMgf1 => with_digest!(self.hash, D => {
                let key = pss::VerifyingKey::<D>::new(public_key);
                pss::Signature::try_from(signature)
                    .map(|signature| key.verify(signing_bytes, &signature).is_ok())
                    .unwrap_or(false)
            }),
        }
    }
}
