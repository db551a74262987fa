//! Issues and verifies [JSON Web Tokens (JWT)][jwt] through named signing
//! profiles.
//!
//! A profile binds a name to a [JWA][jwa] signing algorithm and its key
//! material, with optional header parameters and claims added to every
//! token it issues. Profiles are registered on a [`TokenService`], which
//! encodes tokens with a given profile and decodes tokens, verifying them
//! against one profile or against every registered profile.
//!
//! Supported algorithms are `HS256`, `HS384`, `HS512` (HMAC), `RS256`,
//! `RS384`, `RS512` (RSASSA-PKCS1-v1_5), `PS256`, `PS384`, `PS512`
//! (RSASSA-PSS) and `ES256`, `ES384`, `ES512` (ECDSA on P-256, P-384 and
//! P-521).
//!
//! [jwt]: <https://www.rfc-editor.org/rfc/rfc7519>
//! [jwa]: <https://www.rfc-editor.org/rfc/rfc7518>
//!
//! # Basic Usage
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use ssi_jwt_profiles::{HashStrength, HmacProfileOptions, TokenService};
//!
//! #[derive(Serialize, Deserialize)]
//! pub struct MyClaims {
//!     name: String,
//!     email: String,
//! }
//!
//! let service = TokenService::new();
//! service.register_hmac_profile(HmacProfileOptions::new(
//!     "session",
//!     HashStrength::Sha256,
//!     "my secret",
//! ))?;
//!
//! let claims = MyClaims {
//!     name: "John Smith".to_owned(),
//!     email: "john.smith@example.org".to_owned(),
//! };
//! let token = service.encode("session", &claims)?;
//!
//! // Without a profile name, every registered profile is tried.
//! let decoded = service.decode(&token, None)?;
//! assert!(decoded.is_verified());
//! assert_eq!(decoded.signature.profile.as_deref(), Some("session"));
//!
//! let claims: MyClaims = decoded.payload.deserialize_into()?;
//! assert_eq!(claims.name, "John Smith");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! A token that does not verify is still decoded:
//! [`TokenSignature::verified`] is `false`. Errors are reserved for
//! malformed tokens and unknown profiles.
//!
//! Services can also be built from a JSON [`ServiceConfig`].
pub mod algorithm;
pub mod codec;
pub mod config;
mod decode;
mod encode;
pub mod error;
pub mod key;
pub mod profile;
pub mod service;
pub mod signer;
pub mod store;
pub mod token;

pub use algorithm::{Algorithm, AlgorithmFamily, HashStrength, RsaPadding};
pub use codec::{Base64UrlCodec, CodecError, JsonCodec, StructuredCodec, TextCodec};
pub use config::{ProfileConfig, ServiceConfig};
pub use error::{Error, MalformedToken};
pub use key::{EcCurve, EcdsaKeyPair, HmacKey, KeyError, RsaKeyPair};
pub use profile::{EcdsaProfileOptions, HmacProfileOptions, Profile, RsaProfileOptions};
pub use service::TokenService;
pub use signer::{SignatureError, Signer};
pub use store::ProfileStore;
pub use token::{Claims, DecodedToken, Header, TokenSignature, TOKEN_TYPE};
