use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::{CodecError, StructuredCodec, TextCodec};
use crate::error::Error;
use crate::service::TokenService;
use crate::token::TOKEN_TYPE;

impl<T: TextCodec, S: StructuredCodec> TokenService<T, S> {
    /// Issues a token signed with the named profile.
    ///
    /// The payload must serialize to a JSON object. Its claims are merged
    /// over the profile predefined payload.
    pub fn encode<P: ?Sized + Serialize>(
        &self,
        profile_name: &str,
        payload: &P,
    ) -> Result<String, Error> {
        self.encode_with_header(profile_name, payload, &Map::new())
    }

    /// Issues a token signed with the named profile, adding the given header
    /// parameters.
    ///
    /// Header parameters are applied in this order, later ones replacing
    /// earlier ones: `typ` and `alg`, the profile predefined header, then
    /// `header`. Overriding `typ` yields a token that [`Self::decode`]
    /// rejects.
    pub fn encode_with_header<P: ?Sized + Serialize, H: ?Sized + Serialize>(
        &self,
        profile_name: &str,
        payload: &P,
        header: &H,
    ) -> Result<String, Error> {
        let profiles = self.read();
        let profile = profiles
            .get(profile_name)
            .ok_or_else(|| Error::ProfileNotFound(profile_name.to_owned()))?;

        let mut jose_header = Map::new();
        jose_header.insert("typ".to_owned(), Value::from(TOKEN_TYPE));
        jose_header.insert("alg".to_owned(), Value::from(profile.algorithm().as_str()));
        jose_header.extend(profile.predefined_header().clone());
        jose_header.extend(to_object(header).ok_or(Error::InvalidHeader)??);

        let mut claims = profile.predefined_payload().clone();
        claims.extend(to_object(payload).ok_or(Error::InvalidPayload)??);

        let header_segment = self
            .text_codec
            .encode(&self.structured_codec.serialize(&jose_header)?);
        let payload_segment = self
            .text_codec
            .encode(&self.structured_codec.serialize(&claims)?);
        let signing_input = [header_segment, payload_segment].join(".");
        let signature = profile.signer().sign(signing_input.as_bytes())?;

        log::trace!("encoded token with profile `{}`", profile_name);
        Ok([signing_input, self.text_codec.encode(&signature)].join("."))
    }
}

/// Serializes `value` to a JSON object. Returns `None` if it serializes to
/// anything else.
fn to_object<V: ?Sized + Serialize>(value: &V) -> Option<Result<Map<String, Value>, CodecError>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Some(Ok(map)),
        Ok(_) => None,
        Err(e) => Some(Err(e.into())),
    }
}
