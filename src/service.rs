use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::algorithm::Algorithm;
use crate::codec::{Base64UrlCodec, JsonCodec, StructuredCodec, TextCodec};
use crate::error::Error;
use crate::profile::{EcdsaProfileOptions, HmacProfileOptions, Profile, RsaProfileOptions};
use crate::store::ProfileStore;

/// Token issuing and verification service.
///
/// Holds the registered profiles. Encoding and decoding take a shared
/// lock on the registry, registration and removal take an exclusive one,
/// so the service can be shared between threads.
pub struct TokenService<T = Base64UrlCodec, S = JsonCodec> {
    profiles: RwLock<ProfileStore>,
    pub(crate) text_codec: T,
    pub(crate) structured_codec: S,
}

impl TokenService {
    /// Creates a service with no profiles, using base64url and JSON.
    pub fn new() -> Self {
        Self::with_codecs(Base64UrlCodec, JsonCodec)
    }
}

impl Default for TokenService {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TextCodec, S: StructuredCodec> TokenService<T, S> {
    pub fn with_codecs(text_codec: T, structured_codec: S) -> Self {
        Self {
            profiles: RwLock::new(ProfileStore::new()),
            text_codec,
            structured_codec,
        }
    }

    /// Registers a profile.
    ///
    /// Fails with [`Error::DuplicateProfile`] if a profile with the same
    /// name exists; the existing profile is kept.
    pub fn register(&self, profile: impl Into<Profile>) -> Result<(), Error> {
        let profile = profile.into();
        let name = profile.name().to_owned();
        let algorithm = profile.algorithm();
        self.write().insert(profile)?;
        log::debug!("registered profile `{}` ({})", name, algorithm);
        Ok(())
    }

    /// Registers an `HS256`, `HS384` or `HS512` profile.
    pub fn register_hmac_profile(&self, options: HmacProfileOptions) -> Result<(), Error> {
        self.register(options)
    }

    /// Registers an `RS*` or `PS*` profile, depending on the padding.
    pub fn register_rsa_profile(&self, options: RsaProfileOptions) -> Result<(), Error> {
        self.register(options)
    }

    /// Registers an `ES256`, `ES384` or `ES512` profile.
    pub fn register_ecdsa_profile(&self, options: EcdsaProfileOptions) -> Result<(), Error> {
        let profile = Profile::try_from(options)?;
        self.register(profile)
    }

    /// Removes the named profile. Does nothing if there is none.
    pub fn remove_profile(&self, name: &str) {
        if self.write().remove(name).is_some() {
            log::debug!("removed profile `{}`", name);
        }
    }

    pub fn contains_profile(&self, name: &str) -> bool {
        self.read().contains(name)
    }

    /// Algorithm of the named profile.
    pub fn profile_algorithm(&self, name: &str) -> Option<Algorithm> {
        self.read().get(name).map(Profile::algorithm)
    }

    /// Names of the registered profiles, in registration order.
    pub fn profile_names(&self) -> Vec<String> {
        self.read().names().map(ToOwned::to_owned).collect()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ProfileStore> {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProfileStore> {
        self.profiles.write().unwrap_or_else(PoisonError::into_inner)
    }
}
