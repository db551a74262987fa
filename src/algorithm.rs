use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! algorithms {
    ($(
        $(#[doc = $doc:tt])*
        $id:ident: $name:literal ($family:expr, $hash:ident)
    ),*) => {
        /// Signature algorithm of a profile, as it appears in the `alg`
        /// header parameter.
        #[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Hash, Eq)]
        pub enum Algorithm {
            $(
                $(#[doc = $doc])*
                #[serde(rename = $name)]
                $id
            ),*
        }

        impl Algorithm {
            /// Every supported algorithm.
            pub const ALL: &'static [Algorithm] = &[$(Self::$id),*];

            /// Canonical spelling of the algorithm.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(
                        Self::$id => $name
                    ),*
                }
            }

            /// Algorithm family, including the RSA padding scheme.
            pub fn family(&self) -> AlgorithmFamily {
                match self {
                    $(
                        Self::$id => $family
                    ),*
                }
            }

            /// Hash function strength.
            pub fn hash(&self) -> HashStrength {
                match self {
                    $(
                        Self::$id => HashStrength::$hash
                    ),*
                }
            }
        }

        impl FromStr for Algorithm {
            type Err = UnsupportedAlgorithm;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(
                        $name => Ok(Self::$id),
                    )*
                    other => Err(UnsupportedAlgorithm(other.to_owned()))
                }
            }
        }
    };
}

algorithms! {
    /// HMAC using SHA-256.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518.txt>
    HS256: "HS256" (AlgorithmFamily::Hmac, Sha256),

    /// HMAC using SHA-384.
    HS384: "HS384" (AlgorithmFamily::Hmac, Sha384),

    /// HMAC using SHA-512.
    HS512: "HS512" (AlgorithmFamily::Hmac, Sha512),

    /// RSASSA-PKCS1-v1_5 using SHA-256.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518.txt>
    RS256: "RS256" (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha256),

    /// RSASSA-PKCS1-v1_5 using SHA-384.
    RS384: "RS384" (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha384),

    /// RSASSA-PKCS1-v1_5 using SHA-512.
    RS512: "RS512" (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha512),

    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518.txt>
    PS256: "PS256" (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha256),

    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384.
    PS384: "PS384" (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha384),

    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512.
    PS512: "PS512" (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha512),

    /// ECDSA using P-256 and SHA-256.
    ///
    /// See: <https://www.rfc-editor.org/rfc/rfc7518.txt>
    ES256: "ES256" (AlgorithmFamily::Ecdsa, Sha256),

    /// ECDSA using P-384 and SHA-384.
    ES384: "ES384" (AlgorithmFamily::Ecdsa, Sha384),

    /// ECDSA using P-521 and SHA-512.
    ES512: "ES512" (AlgorithmFamily::Ecdsa, Sha512)
}

impl Algorithm {
    /// Computes the algorithm identified by a family and a hash strength.
    ///
    /// This is total over the supported algorithms: every combination maps
    /// to exactly one variant.
    pub fn from_parts(family: AlgorithmFamily, hash: HashStrength) -> Self {
        use HashStrength::*;
        match (family, hash) {
            (AlgorithmFamily::Hmac, Sha256) => Self::HS256,
            (AlgorithmFamily::Hmac, Sha384) => Self::HS384,
            (AlgorithmFamily::Hmac, Sha512) => Self::HS512,
            (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha256) => Self::RS256,
            (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha384) => Self::RS384,
            (AlgorithmFamily::Rsa(RsaPadding::Pkcs1v15), Sha512) => Self::RS512,
            (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha256) => Self::PS256,
            (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha384) => Self::PS384,
            (AlgorithmFamily::Rsa(RsaPadding::PssMgf1), Sha512) => Self::PS512,
            (AlgorithmFamily::Ecdsa, Sha256) => Self::ES256,
            (AlgorithmFamily::Ecdsa, Sha384) => Self::ES384,
            (AlgorithmFamily::Ecdsa, Sha512) => Self::ES512,
        }
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl PartialEq<str> for Algorithm {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported signature algorithm `{0}`")]
pub struct UnsupportedAlgorithm(pub String);

/// Hash function strength of an algorithm.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HashStrength {
    /// SHA-256.
    Sha256,

    /// SHA-384.
    Sha384,

    /// SHA-512.
    Sha512,
}

impl HashStrength {
    /// Digest output length in bytes.
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for HashStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("SHA-256"),
            Self::Sha384 => f.write_str("SHA-384"),
            Self::Sha512 => f.write_str("SHA-512"),
        }
    }
}

/// RSA signature padding scheme.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RsaPadding {
    /// RSASSA-PKCS1 v1.5
    #[default]
    #[serde(rename = "pkcs1v15")]
    Pkcs1v15,

    /// RSASSA-PSS with MGF1 using the same hash function.
    #[serde(rename = "pss-mgf1")]
    PssMgf1,
}

/// Family of signature functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// HMAC
    Hmac,

    /// RSA with the given padding.
    Rsa(RsaPadding),

    /// ECDSA
    Ecdsa,
}
