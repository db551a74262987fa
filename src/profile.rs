use core::fmt;

use serde_json::{Map, Value};

use crate::algorithm::{Algorithm, HashStrength, RsaPadding};
use crate::key::{EcdsaKeyPair, HmacKey, KeyError, RsaKeyPair};
use crate::signer::{EcdsaSigner, HmacSigner, RsaSigner, Signer};

/// Named signing configuration.
///
/// A profile binds an algorithm and its key material (through a
/// [`Signer`]) to a name, along with header parameters and claims merged
/// into every token it issues.
pub struct Profile {
    name: String,
    algorithm: Algorithm,
    signer: Box<dyn Signer>,
    predefined_header: Map<String, Value>,
    predefined_payload: Map<String, Value>,
}

impl Profile {
    /// Creates a profile using the given signer. The profile algorithm is
    /// the one of the signer.
    pub fn new(name: impl Into<String>, signer: impl Signer + 'static) -> Self {
        Self {
            name: name.into(),
            algorithm: signer.algorithm(),
            signer: Box::new(signer),
            predefined_header: Map::new(),
            predefined_payload: Map::new(),
        }
    }

    pub fn with_predefined_header(mut self, header: Map<String, Value>) -> Self {
        self.predefined_header = header;
        self
    }

    pub fn with_predefined_payload(mut self, payload: Map<String, Value>) -> Self {
        self.predefined_payload = payload;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn signer(&self) -> &dyn Signer {
        self.signer.as_ref()
    }

    pub fn predefined_header(&self) -> &Map<String, Value> {
        &self.predefined_header
    }

    pub fn predefined_payload(&self) -> &Map<String, Value> {
        &self.predefined_payload
    }

    /// Checks that a token declaring `alg` may be verified with this
    /// profile, then checks the signature.
    pub(crate) fn verify(&self, alg: &str, signing_bytes: &[u8], signature: &[u8]) -> bool {
        self.algorithm == *alg && self.signer.verify(signing_bytes, signature)
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("algorithm", &self.algorithm)
            .field("predefined_header", &self.predefined_header)
            .field("predefined_payload", &self.predefined_payload)
            .finish_non_exhaustive()
    }
}

/// Options of an HMAC profile (`HS256`, `HS384`, `HS512`).
#[derive(Debug, Clone)]
pub struct HmacProfileOptions {
    pub name: String,
    pub hash: HashStrength,
    pub key: HmacKey,
    pub predefined_header: Map<String, Value>,
    pub predefined_payload: Map<String, Value>,
}

impl HmacProfileOptions {
    pub fn new(name: impl Into<String>, hash: HashStrength, key: impl Into<HmacKey>) -> Self {
        Self {
            name: name.into(),
            hash,
            key: key.into(),
            predefined_header: Map::new(),
            predefined_payload: Map::new(),
        }
    }

    pub fn with_predefined_header(mut self, header: Map<String, Value>) -> Self {
        self.predefined_header = header;
        self
    }

    pub fn with_predefined_payload(mut self, payload: Map<String, Value>) -> Self {
        self.predefined_payload = payload;
        self
    }
}

impl From<HmacProfileOptions> for Profile {
    fn from(options: HmacProfileOptions) -> Self {
        Profile::new(options.name, HmacSigner::new(options.hash, options.key))
            .with_predefined_header(options.predefined_header)
            .with_predefined_payload(options.predefined_payload)
    }
}

/// Options of an RSA profile (`RS*` with PKCS#1 v1.5 padding, `PS*` with
/// PSS-MGF1 padding).
#[derive(Debug, Clone)]
pub struct RsaProfileOptions {
    pub name: String,
    pub hash: HashStrength,
    pub key: RsaKeyPair,
    pub padding: RsaPadding,
    pub predefined_header: Map<String, Value>,
    pub predefined_payload: Map<String, Value>,
}

impl RsaProfileOptions {
    pub fn new(name: impl Into<String>, hash: HashStrength, key: RsaKeyPair) -> Self {
        Self {
            name: name.into(),
            hash,
            key,
            padding: RsaPadding::default(),
            predefined_header: Map::new(),
            predefined_payload: Map::new(),
        }
    }

    pub fn with_padding(mut self, padding: RsaPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_predefined_header(mut self, header: Map<String, Value>) -> Self {
        self.predefined_header = header;
        self
    }

    pub fn with_predefined_payload(mut self, payload: Map<String, Value>) -> Self {
        self.predefined_payload = payload;
        self
    }
}

impl From<RsaProfileOptions> for Profile {
    fn from(options: RsaProfileOptions) -> Self {
        Profile::new(
            options.name,
            RsaSigner::new(options.hash, options.padding, options.key),
        )
        .with_predefined_header(options.predefined_header)
        .with_predefined_payload(options.predefined_payload)
    }
}

/// Options of an ECDSA profile (`ES256`, `ES384`, `ES512`).
///
/// The key curve must be the one paired with the hash strength by JWA.
#[derive(Debug)]
pub struct EcdsaProfileOptions {
    pub name: String,
    pub hash: HashStrength,
    pub key: EcdsaKeyPair,
    pub predefined_header: Map<String, Value>,
    pub predefined_payload: Map<String, Value>,
}

impl EcdsaProfileOptions {
    pub fn new(name: impl Into<String>, hash: HashStrength, key: EcdsaKeyPair) -> Self {
        Self {
            name: name.into(),
            hash,
            key,
            predefined_header: Map::new(),
            predefined_payload: Map::new(),
        }
    }

    pub fn with_predefined_header(mut self, header: Map<String, Value>) -> Self {
        self.predefined_header = header;
        self
    }

    pub fn with_predefined_payload(mut self, payload: Map<String, Value>) -> Self {
        self.predefined_payload = payload;
        self
    }
}

impl TryFrom<EcdsaProfileOptions> for Profile {
    type Error = KeyError;

    fn try_from(options: EcdsaProfileOptions) -> Result<Self, Self::Error> {
        let signer = EcdsaSigner::new(options.hash, options.key)?;
        Ok(Profile::new(options.name, signer)
            .with_predefined_header(options.predefined_header)
            .with_predefined_payload(options.predefined_payload))
    }
}
