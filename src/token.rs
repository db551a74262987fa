use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value of the `typ` header parameter of every token.
pub const TOKEN_TYPE: &str = "JWT";

/// Decoded JOSE header.
///
/// Holds every header parameter found in the token, not only `typ` and
/// `alg`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    pub fn new(parameters: Map<String, Value>) -> Self {
        Self(parameters)
    }

    /// Value of the `typ` parameter.
    pub fn typ(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Value of the `alg` parameter, as written in the token.
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Decoded token payload.
///
/// The registered claim names of RFC 7519 have typed accessors, but no
/// claim is validated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// `iss` (Issuer) claim.
    pub fn issuer(&self) -> Option<&str> {
        self.str_claim("iss")
    }

    /// `sub` (Subject) claim.
    pub fn subject(&self) -> Option<&str> {
        self.str_claim("sub")
    }

    /// `aud` (Audience) claim, either a single string or an array of
    /// strings.
    pub fn audience(&self) -> Option<Vec<&str>> {
        match self.0.get("aud")? {
            Value::String(aud) => Some(vec![aud.as_str()]),
            Value::Array(values) => values.iter().map(Value::as_str).collect(),
            _ => None,
        }
    }

    /// `exp` (Expiration Time) claim, as a NumericDate.
    pub fn expiration_time(&self) -> Option<i64> {
        self.numeric_date("exp")
    }

    /// `nbf` (Not Before) claim, as a NumericDate.
    pub fn not_before(&self) -> Option<i64> {
        self.numeric_date("nbf")
    }

    /// `iat` (Issued At) claim, as a NumericDate.
    pub fn issued_at(&self) -> Option<i64> {
        self.numeric_date("iat")
    }

    /// `jti` (JWT ID) claim.
    pub fn jwt_id(&self) -> Option<&Value> {
        self.0.get("jti")
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Deserializes the claims into `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(Value::Object(self.0.clone()))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    fn str_claim(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    fn numeric_date(&self, name: &str) -> Option<i64> {
        let value = self.0.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|seconds| seconds.trunc() as i64))
    }
}

/// Signature segment of a decoded token and the verification outcome.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TokenSignature {
    /// Signature segment, as found in the token.
    pub value: String,

    pub verified: bool,

    /// Name of the profile that verified the signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Result of decoding a token.
///
/// A decoded token is returned whether or not the signature verified;
/// check [`TokenSignature::verified`].
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: Header,
    pub payload: Claims,
    pub signature: TokenSignature,
}

impl DecodedToken {
    pub fn is_verified(&self) -> bool {
        self.signature.verified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Claims {
        match value {
            Value::Object(map) => Claims::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn registered_claims() {
        let claims = claims(json!({
            "iss": "did:example:issuer",
            "sub": "alice",
            "aud": ["a", "b"],
            "exp": 1300819380,
            "nbf": 1300819000.5,
            "jti": 7
        }));
        assert_eq!(claims.issuer(), Some("did:example:issuer"));
        assert_eq!(claims.subject(), Some("alice"));
        assert_eq!(claims.audience(), Some(vec!["a", "b"]));
        assert_eq!(claims.expiration_time(), Some(1300819380));
        assert_eq!(claims.not_before(), Some(1300819000));
        assert_eq!(claims.issued_at(), None);
        assert_eq!(claims.jwt_id(), Some(&json!(7)));
    }

    #[test]
    fn single_audience() {
        let claims = claims(json!({ "aud": "a", "iss": 1 }));
        assert_eq!(claims.audience(), Some(vec!["a"]));
        assert_eq!(claims.issuer(), None);
    }

    #[test]
    fn deserialize_private_claims() {
        #[derive(Deserialize)]
        struct MyClaims {
            name: String,
            admin: bool,
        }

        let claims = claims(json!({ "name": "John Smith", "admin": true, "iat": 1 }));
        let my: MyClaims = claims.deserialize_into().unwrap();
        assert_eq!(my.name, "John Smith");
        assert!(my.admin);
    }
}
