//! Key material bound to signing profiles.
use core::fmt;

use rand::{rngs::OsRng, RngCore};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::algorithm::HashStrength;

/// Smallest accepted RSA modulus, in bits.
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// Key material error.
#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("missing key material")]
    Missing,

    #[error("invalid {0} key")]
    Invalid(&'static str),

    #[error("public and private keys do not match")]
    Mismatch,

    #[error("RSA modulus of {0} bits is below the minimum of {MIN_RSA_KEY_BITS} bits")]
    RsaKeyTooSmall(usize),

    #[error("curve {curve} cannot be used with {hash}")]
    CurveMismatch { curve: EcCurve, hash: HashStrength },

    #[error(transparent)]
    Rsa(#[from] rsa::Error),
}

/// HMAC secret.
#[derive(Clone, ZeroizeOnDrop)]
pub struct HmacKey(Box<[u8]>);

impl HmacKey {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self(value.into().into_boxed_slice())
    }

    /// Generates a random secret of `len` bytes.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HmacKey").field(&"..").finish()
    }
}

impl From<Vec<u8>> for HmacKey {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for HmacKey {
    fn from(value: &[u8]) -> Self {
        Self::new(value)
    }
}

impl From<&str> for HmacKey {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for HmacKey {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

/// RSA public key, with its private counterpart when the profile signs.
#[derive(Clone)]
pub struct RsaKeyPair {
    public: RsaPublicKey,
    private: Option<RsaPrivateKey>,
}

impl RsaKeyPair {
    pub fn new(private: RsaPrivateKey) -> Result<Self, KeyError> {
        let public = private.to_public_key();
        Self::checked(public, Some(private))
    }

    /// Verification-only key pair.
    pub fn public_only(public: RsaPublicKey) -> Result<Self, KeyError> {
        Self::checked(public, None)
    }

    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        let private = RsaPrivateKey::new(&mut OsRng, bits)?;
        Self::new(private)
    }

    /// Reads PEM-encoded keys. PKCS#8 / SPKI and PKCS#1 encodings are
    /// accepted. The public key is derived from the private key when
    /// omitted.
    pub fn from_pem(public_pem: Option<&str>, private_pem: Option<&str>) -> Result<Self, KeyError> {
        let private = private_pem
            .map(|pem| {
                RsaPrivateKey::from_pkcs8_pem(pem)
                    .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
                    .map_err(|_| KeyError::Invalid("RSA private"))
            })
            .transpose()?;
        let public = match (public_pem, &private) {
            (Some(pem), _) => RsaPublicKey::from_public_key_pem(pem)
                .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
                .map_err(|_| KeyError::Invalid("RSA public"))?,
            (None, Some(private)) => private.to_public_key(),
            (None, None) => return Err(KeyError::Missing),
        };
        Self::checked(public, private)
    }

    fn checked(public: RsaPublicKey, private: Option<RsaPrivateKey>) -> Result<Self, KeyError> {
        let bits = public.size() * 8;
        if bits < MIN_RSA_KEY_BITS {
            return Err(KeyError::RsaKeyTooSmall(bits));
        }
        if let Some(private) = &private {
            if private.to_public_key() != public {
                return Err(KeyError::Mismatch);
            }
        }
        Ok(Self { public, private })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn private_key(&self) -> Option<&RsaPrivateKey> {
        self.private.as_ref()
    }
}

impl fmt::Debug for RsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyPair")
            .field("bits", &(self.public.size() * 8))
            .field("private", &self.private.is_some())
            .finish()
    }
}

/// Elliptic curve of an ECDSA key.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    #[serde(rename = "P-256")]
    P256,

    #[serde(rename = "P-384")]
    P384,

    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    /// Hash strength JWA pairs with this curve.
    pub fn hash(self) -> HashStrength {
        match self {
            Self::P256 => HashStrength::Sha256,
            Self::P384 => HashStrength::Sha384,
            Self::P521 => HashStrength::Sha512,
        }
    }

    pub fn for_hash(hash: HashStrength) -> Self {
        match hash {
            HashStrength::Sha256 => Self::P256,
            HashStrength::Sha384 => Self::P384,
            HashStrength::Sha512 => Self::P521,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P256 => f.write_str("P-256"),
            Self::P384 => f.write_str("P-384"),
            Self::P521 => f.write_str("P-521"),
        }
    }
}

/// ECDSA verifying key, with its signing counterpart when the profile
/// signs.
pub enum EcdsaKeyPair {
    P256 {
        verifying: p256::ecdsa::VerifyingKey,
        signing: Option<p256::ecdsa::SigningKey>,
    },
    P384 {
        verifying: p384::ecdsa::VerifyingKey,
        signing: Option<p384::ecdsa::SigningKey>,
    },
    P521 {
        verifying: p521::ecdsa::VerifyingKey,
        signing: Option<p521::ecdsa::SigningKey>,
    },
}

macro_rules! curve {
    ($module:ident, $krate:ident, $variant:ident, $label:literal) => {
        mod $module {
            use super::{EcdsaKeyPair, KeyError};
            use $krate::elliptic_curve::sec1::ToEncodedPoint;
            use $krate::elliptic_curve::pkcs8::{DecodePrivateKey, DecodePublicKey};

            fn build(
                public: $krate::PublicKey,
                secret: Option<$krate::SecretKey>,
            ) -> Result<EcdsaKeyPair, KeyError> {
                let verifying = $krate::ecdsa::VerifyingKey::from_sec1_bytes(
                    public.to_encoded_point(false).as_bytes(),
                )
                .map_err(|_| KeyError::Invalid(concat!($label, " public")))?;
                let signing = match secret {
                    Some(secret) => {
                        if secret.public_key() != public {
                            return Err(KeyError::Mismatch);
                        }
                        let signing = $krate::ecdsa::SigningKey::from_bytes(&secret.to_bytes())
                            .map_err(|_| KeyError::Invalid(concat!($label, " private")))?;
                        Some(signing)
                    }
                    None => None,
                };
                Ok(EcdsaKeyPair::$variant { verifying, signing })
            }

            pub(super) fn generate() -> Result<EcdsaKeyPair, KeyError> {
                let secret = $krate::SecretKey::random(&mut rand::rngs::OsRng);
                build(secret.public_key(), Some(secret))
            }

            /// Returns `None` when the PEM documents are not keys on this
            /// curve.
            pub(super) fn from_pem(
                public_pem: Option<&str>,
                private_pem: Option<&str>,
            ) -> Option<Result<EcdsaKeyPair, KeyError>> {
                let secret = match private_pem {
                    Some(pem) => Some(
                        $krate::SecretKey::from_pkcs8_pem(pem)
                            .or_else(|_| $krate::SecretKey::from_sec1_pem(pem))
                            .ok()?,
                    ),
                    None => None,
                };
                let public = match (public_pem, &secret) {
                    (Some(pem), _) => match $krate::PublicKey::from_public_key_pem(pem) {
                        Ok(public) => public,
                        Err(_) if secret.is_some() => {
                            return Some(Err(KeyError::Invalid(concat!($label, " public"))))
                        }
                        Err(_) => return None,
                    },
                    (None, Some(secret)) => secret.public_key(),
                    (None, None) => return Some(Err(KeyError::Missing)),
                };
                Some(build(public, secret))
            }
        }
    };
}

curve!(p256_keys, p256, P256, "P-256");
curve!(p384_keys, p384, P384, "P-384");
curve!(p521_keys, p521, P521, "P-521");

impl EcdsaKeyPair {
    pub fn generate(curve: EcCurve) -> Result<Self, KeyError> {
        match curve {
            EcCurve::P256 => p256_keys::generate(),
            EcCurve::P384 => p384_keys::generate(),
            EcCurve::P521 => p521_keys::generate(),
        }
    }

    /// Reads PEM-encoded keys (PKCS#8 or SEC1 private key, SPKI public
    /// key). The curve is detected from the key encoding. The public key is
    /// derived from the private key when omitted.
    pub fn from_pem(public_pem: Option<&str>, private_pem: Option<&str>) -> Result<Self, KeyError> {
        if public_pem.is_none() && private_pem.is_none() {
            return Err(KeyError::Missing);
        }
        p256_keys::from_pem(public_pem, private_pem)
            .or_else(|| p384_keys::from_pem(public_pem, private_pem))
            .or_else(|| p521_keys::from_pem(public_pem, private_pem))
            .unwrap_or(Err(KeyError::Invalid("ECDSA")))
    }

    pub fn curve(&self) -> EcCurve {
        match self {
            Self::P256 { .. } => EcCurve::P256,
            Self::P384 { .. } => EcCurve::P384,
            Self::P521 { .. } => EcCurve::P521,
        }
    }

    /// Checks if the key pair can sign.
    pub fn has_signing_key(&self) -> bool {
        match self {
            Self::P256 { signing, .. } => signing.is_some(),
            Self::P384 { signing, .. } => signing.is_some(),
            Self::P521 { signing, .. } => signing.is_some(),
        }
    }
}

impl fmt::Debug for EcdsaKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaKeyPair")
            .field("curve", &self.curve())
            .field("private", &self.has_signing_key())
            .finish()
    }
}
