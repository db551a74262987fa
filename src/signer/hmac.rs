use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};

use super::{SignatureError, Signer};
use crate::algorithm::{Algorithm, AlgorithmFamily, HashStrength};
use crate::key::HmacKey;

/// HS256, HS384 or HS512 signer.
#[derive(Debug, Clone)]
pub struct HmacSigner {
    hash: HashStrength,
    key: HmacKey,
}

impl HmacSigner {
    pub fn new(hash: HashStrength, key: HmacKey) -> Self {
        Self { hash, key }
    }
}

fn keyed<M: Mac + KeyInit>(key: &[u8], signing_bytes: &[u8]) -> Result<M, SignatureError> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| SignatureError::InvalidKeyLength)?;
    mac.update(signing_bytes);
    Ok(mac)
}

impl Signer for HmacSigner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::from_parts(AlgorithmFamily::Hmac, self.hash)
    }

    fn sign(&self, signing_bytes: &[u8]) -> Result<Vec<u8>, SignatureError> {
        let key = self.key.as_bytes();
        with_digest!(self.hash, D => {
            let mac = keyed::<Hmac<D>>(key, signing_bytes)?;
            Ok(mac.finalize().into_bytes().to_vec())
        })
    }

    fn verify(&self, signing_bytes: &[u8], signature: &[u8]) -> bool {
        let key = self.key.as_bytes();
        with_digest!(self.hash, D => {
            keyed::<Hmac<D>>(key, signing_bytes)
                .map(|mac| mac.verify_slice(signature).is_ok())
                .unwrap_or(false)
        })
    }
}
