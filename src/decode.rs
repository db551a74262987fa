use serde_json::Value;

use crate::codec::{CodecError, StructuredCodec, TextCodec};
use crate::error::{Error, MalformedToken};
use crate::service::TokenService;
use crate::token::{Claims, DecodedToken, Header, TokenSignature, TOKEN_TYPE};

impl<T: TextCodec, S: StructuredCodec> TokenService<T, S> {
    /// Decodes a token and verifies its signature.
    ///
    /// With a profile name, only that profile is tried, and
    /// [`Error::ProfileNotFound`] is returned if it does not exist. Without
    /// one, profiles are tried in registration order and the first one whose
    /// algorithm matches the token `alg` and whose key verifies the signature
    /// wins.
    ///
    /// A token that is well-formed but fails verification is not an error:
    /// it is returned with [`TokenSignature::verified`] set to `false`.
    pub fn decode(&self, token: &str, profile_name: Option<&str>) -> Result<DecodedToken, Error> {
        let segments: Vec<&str> = token.split('.').collect();
        let &[header_segment, payload_segment, signature_segment] = segments.as_slice() else {
            return Err(MalformedToken::SegmentCount(segments.len()).into());
        };

        let header = match self
            .decode_segment(header_segment)
            .map_err(MalformedToken::Header)?
        {
            Value::Object(map) => Header::new(map),
            _ => return Err(MalformedToken::HeaderNotObject.into()),
        };
        if header.typ() != Some(TOKEN_TYPE) {
            return Err(MalformedToken::InvalidType.into());
        }
        let alg = header.algorithm().ok_or(MalformedToken::MissingAlgorithm)?;

        let payload = match self
            .decode_segment(payload_segment)
            .map_err(MalformedToken::Payload)?
        {
            Value::Object(map) => Claims::new(map),
            _ => return Err(MalformedToken::PayloadNotObject.into()),
        };

        let signing_input = &token[..header_segment.len() + 1 + payload_segment.len()];
        let signature = self.text_codec.decode(signature_segment).ok();

        let profiles = self.read();
        let verified_by = match profile_name {
            Some(name) => {
                let profile = profiles
                    .get(name)
                    .ok_or_else(|| Error::ProfileNotFound(name.to_owned()))?;
                signature
                    .as_deref()
                    .filter(|sig| profile.verify(alg, signing_input.as_bytes(), sig))
                    .map(|_| profile.name().to_owned())
            }
            None => signature.as_deref().and_then(|sig| {
                profiles
                    .iter()
                    .find(|profile| profile.verify(alg, signing_input.as_bytes(), sig))
                    .map(|profile| profile.name().to_owned())
            }),
        };
        drop(profiles);

        match &verified_by {
            Some(name) => log::debug!("token ({}) verified by profile `{}`", alg, name),
            None => log::debug!("token ({}) not verified", alg),
        }

        Ok(DecodedToken {
            header,
            payload,
            signature: TokenSignature {
                value: signature_segment.to_owned(),
                verified: verified_by.is_some(),
                profile: verified_by,
            },
        })
    }

    fn decode_segment(&self, segment: &str) -> Result<Value, CodecError> {
        let bytes = self.text_codec.decode(segment)?;
        self.structured_codec.deserialize(&bytes)
    }
}
