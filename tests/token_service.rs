use std::sync::Arc;
use std::thread;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use ssi_jwt_profiles::{
    Algorithm, EcdsaKeyPair, EcdsaProfileOptions, Error, HashStrength, HmacProfileOptions,
    KeyError, MalformedToken, RsaKeyPair, RsaPadding, RsaProfileOptions, ServiceConfig,
    SignatureError, TokenService,
};

const RSA_PRIVATE: &str = include_str!("fixtures/rsa-2048.pem");
const RSA_PUBLIC: &str = include_str!("fixtures/rsa-2048.pub.pem");
const RSA_B_PRIVATE: &str = include_str!("fixtures/rsa-2048-b.pem");
const RSA_1024: &str = include_str!("fixtures/rsa-1024.pem");
const P256_PRIVATE: &str = include_str!("fixtures/p-256.pem");
const P256_PUBLIC: &str = include_str!("fixtures/p-256.pub.pem");
const P384_PRIVATE: &str = include_str!("fixtures/p-384.pem");
const P521_PRIVATE: &str = include_str!("fixtures/p-521.pem");

fn init_logger() {
    let _ = stderrlog::new().verbosity(4).init();
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn rsa_key() -> RsaKeyPair {
    RsaKeyPair::from_pem(None, Some(RSA_PRIVATE)).unwrap()
}

fn ecdsa_key(pem: &str) -> EcdsaKeyPair {
    EcdsaKeyPair::from_pem(None, Some(pem)).unwrap()
}

/// One profile per supported algorithm, named after it.
fn all_algorithms() -> TokenService {
    let service = TokenService::new();
    for hash in [HashStrength::Sha256, HashStrength::Sha384, HashStrength::Sha512] {
        let alg = |family: &str| format!("{}{}", family, hash.output_len() * 8);
        service
            .register_hmac_profile(
                HmacProfileOptions::new(alg("HS"), hash, "a shared secret")
                    .with_predefined_payload(object(json!({ "iss": "issuer", "scope": "all" }))),
            )
            .unwrap();
        service
            .register_rsa_profile(RsaProfileOptions::new(alg("RS"), hash, rsa_key()))
            .unwrap();
        service
            .register_rsa_profile(
                RsaProfileOptions::new(alg("PS"), hash, rsa_key())
                    .with_padding(RsaPadding::PssMgf1),
            )
            .unwrap();
        let pem = match hash {
            HashStrength::Sha256 => P256_PRIVATE,
            HashStrength::Sha384 => P384_PRIVATE,
            HashStrength::Sha512 => P521_PRIVATE,
        };
        service
            .register_ecdsa_profile(EcdsaProfileOptions::new(alg("ES"), hash, ecdsa_key(pem)))
            .unwrap();
    }
    service
}

#[test]
fn round_trip_every_algorithm() {
    init_logger();
    let service = all_algorithms();
    assert_eq!(service.profile_names().len(), Algorithm::ALL.len());

    for alg in Algorithm::ALL {
        let name = alg.as_str();
        assert_eq!(service.profile_algorithm(name), Some(*alg));

        let token = service
            .encode(name, &json!({ "sub": "alice", "scope": "read" }))
            .unwrap();
        let decoded = service.decode(&token, Some(name)).unwrap();
        assert!(decoded.is_verified(), "{} did not verify", name);
        assert_eq!(decoded.signature.profile.as_deref(), Some(name));
        assert_eq!(decoded.header.algorithm(), Some(name));
        assert_eq!(decoded.header.typ(), Some("JWT"));

        let expected = if alg.as_str().starts_with("HS") {
            json!({ "iss": "issuer", "scope": "read", "sub": "alice" })
        } else {
            json!({ "sub": "alice", "scope": "read" })
        };
        assert_eq!(Value::Object(decoded.payload.into_map()), expected);

        // Only the profile with the token algorithm verifies it.
        let decoded = service.decode(&token, None).unwrap();
        assert_eq!(decoded.signature.profile.as_deref(), Some(name));
    }
}

#[test]
fn typed_claims() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct MyClaims {
        sub: String,
        exp: i64,
        admin: bool,
    }

    let service = all_algorithms();
    let claims = MyClaims {
        sub: "alice".to_owned(),
        exp: 1_900_000_000,
        admin: false,
    };
    let token = service.encode("ES256", &claims).unwrap();
    let decoded = service.decode(&token, Some("ES256")).unwrap();
    assert_eq!(decoded.payload.expiration_time(), Some(1_900_000_000));
    assert_eq!(decoded.payload.deserialize_into::<MyClaims>().unwrap(), claims);
}

#[test]
fn tampered_signature_does_not_verify() {
    init_logger();
    let service = all_algorithms();

    let token = service.encode("HS256", &json!({ "sub": "alice" })).unwrap();
    let signature_start = token.rfind('.').unwrap() + 1;
    for i in signature_start..token.len() {
        let mut tampered = token.clone().into_bytes();
        tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        let decoded = service.decode(&tampered, Some("HS256")).unwrap();
        assert!(!decoded.is_verified(), "tampered at {}", i);
        assert_eq!(decoded.signature.profile, None);
    }

    for name in ["RS256", "PS384", "ES512"] {
        let token = service.encode(name, &json!({ "sub": "alice" })).unwrap();
        let (signing_input, signature) = token.rsplit_once('.').unwrap();
        let first = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", signing_input, first, &signature[1..]);
        assert!(!service.decode(&tampered, Some(name)).unwrap().is_verified());
        assert!(!service.decode(&tampered, None).unwrap().is_verified());
    }
}

#[test]
fn tampered_payload_does_not_verify() {
    let service = all_algorithms();
    let token = service.encode("RS384", &json!({ "admin": false })).unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    let forged = base64::Engine::encode(
        &base64::prelude::BASE64_URL_SAFE_NO_PAD,
        br#"{"admin":true}"#,
    );
    let tampered = format!("{}.{}.{}", segments[0], forged, segments[2]);
    let decoded = service.decode(&tampered, None).unwrap();
    assert!(!decoded.is_verified());
    assert_eq!(decoded.payload.get("admin"), Some(&json!(true)));
}

#[test]
fn other_key_does_not_verify() {
    let service = TokenService::new();
    service
        .register_hmac_profile(HmacProfileOptions::new("a", HashStrength::Sha256, "key a"))
        .unwrap();
    service
        .register_hmac_profile(HmacProfileOptions::new("b", HashStrength::Sha256, "key b"))
        .unwrap();
    service
        .register_rsa_profile(RsaProfileOptions::new(
            "rsa-b",
            HashStrength::Sha256,
            RsaKeyPair::from_pem(None, Some(RSA_B_PRIVATE)).unwrap(),
        ))
        .unwrap();
    service
        .register_rsa_profile(RsaProfileOptions::new("rsa-a", HashStrength::Sha256, rsa_key()))
        .unwrap();

    let token = service.encode("a", &json!({})).unwrap();
    assert!(!service.decode(&token, Some("b")).unwrap().is_verified());
    assert!(service.decode(&token, Some("a")).unwrap().is_verified());

    let token = service.encode("rsa-a", &json!({})).unwrap();
    assert!(!service.decode(&token, Some("rsa-b")).unwrap().is_verified());
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("rsa-a"));
}

#[test]
fn header_algorithm_must_match_profile() {
    let service = TokenService::new();
    // The signer accepts the bytes, but the header declares another
    // algorithm.
    service
        .register_hmac_profile(
            HmacProfileOptions::new("lying", HashStrength::Sha256, "secret")
                .with_predefined_header(object(json!({ "alg": "HS384" }))),
        )
        .unwrap();
    let token = service.encode("lying", &json!({})).unwrap();
    let decoded = service.decode(&token, Some("lying")).unwrap();
    assert_eq!(decoded.header.algorithm(), Some("HS384"));
    assert!(!decoded.is_verified());

    // Same RSA key, other padding.
    service
        .register_rsa_profile(RsaProfileOptions::new("rs", HashStrength::Sha256, rsa_key()))
        .unwrap();
    service
        .register_rsa_profile(
            RsaProfileOptions::new("ps", HashStrength::Sha256, rsa_key())
                .with_padding(RsaPadding::PssMgf1),
        )
        .unwrap();
    let token = service.encode("rs", &json!({})).unwrap();
    assert!(!service.decode(&token, Some("ps")).unwrap().is_verified());

    // Algorithm names are case-sensitive.
    let token = service
        .encode_with_header("rs", &json!({}), &json!({ "alg": "rs256" }))
        .unwrap();
    assert!(!service.decode(&token, Some("rs")).unwrap().is_verified());
    assert!(!service.decode(&token, None).unwrap().is_verified());
}

#[test]
fn duplicate_profile() {
    let service = TokenService::new();
    service
        .register_hmac_profile(HmacProfileOptions::new("p", HashStrength::Sha256, "first"))
        .unwrap();
    let err = service
        .register_rsa_profile(RsaProfileOptions::new("p", HashStrength::Sha256, rsa_key()))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateProfile(name) if name == "p"));

    let token = service.encode("p", &json!({})).unwrap();
    let decoded = service.decode(&token, Some("p")).unwrap();
    assert_eq!(decoded.header.algorithm(), Some("HS256"));
    assert!(decoded.is_verified());
}

#[test]
fn malformed_tokens() {
    let service = all_algorithms();
    let token = service.encode("HS256", &json!({})).unwrap();
    let segments: Vec<&str> = token.split('.').collect();

    let cases = [
        segments[0].to_owned(),
        segments[..2].join("."),
        format!("{}.extra", token),
        format!("{}..", token),
        String::new(),
        format!("e30.{}.{}", segments[1], segments[2]),
        format!("bm90IGpzb24.{}.{}", segments[1], segments[2]),
    ];
    for token in &cases {
        assert!(
            matches!(service.decode(token, None), Err(Error::MalformedToken(_))),
            "{:?} was accepted",
            token
        );
    }

    // `e30` is `{}`: no `typ`.
    assert!(matches!(
        service.decode(&cases[5], None),
        Err(Error::MalformedToken(MalformedToken::InvalidType))
    ));
    assert!(matches!(
        service.decode(&cases[6], None),
        Err(Error::MalformedToken(MalformedToken::Header(_)))
    ));
}

#[test]
fn malformed_before_profile_lookup() {
    let service = TokenService::new();
    assert!(matches!(
        service.decode("a.b", Some("nonexistent")),
        Err(Error::MalformedToken(MalformedToken::SegmentCount(2)))
    ));
}

#[test]
fn unknown_profile() {
    init_logger();
    let service = all_algorithms();
    assert!(matches!(
        service.encode("nonexistent", &json!({})),
        Err(Error::ProfileNotFound(name)) if name == "nonexistent"
    ));
    let token = service.encode("HS256", &json!({})).unwrap();
    assert!(matches!(
        service.decode(&token, Some("nonexistent")),
        Err(Error::ProfileNotFound(name)) if name == "nonexistent"
    ));

    service.remove_profile("HS256");
    assert!(matches!(
        service.encode("HS256", &json!({})),
        Err(Error::ProfileNotFound(_))
    ));
    assert!(!service.decode(&token, None).unwrap().is_verified());
}

#[test]
fn first_registered_profile_wins() {
    init_logger();
    let service = TokenService::new();
    for name in ["first", "second"] {
        service
            .register_hmac_profile(HmacProfileOptions::new(name, HashStrength::Sha256, "shared"))
            .unwrap();
    }
    let token = service.encode("second", &json!({})).unwrap();
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("first"));

    // A later registration with the same key does not change the outcome.
    service
        .register_hmac_profile(HmacProfileOptions::new("third", HashStrength::Sha256, "shared"))
        .unwrap();
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("first"));

    service.remove_profile("first");
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("second"));

    // Re-registering moves the profile to the end.
    service
        .register_hmac_profile(HmacProfileOptions::new("first", HashStrength::Sha256, "shared"))
        .unwrap();
    assert_eq!(service.profile_names(), ["second", "third", "first"]);
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("second"));
}

#[test]
fn verify_only_profiles() {
    let issuer = all_algorithms();
    let verifier = TokenService::new();
    verifier
        .register_rsa_profile(RsaProfileOptions::new(
            "rs",
            HashStrength::Sha512,
            RsaKeyPair::from_pem(Some(RSA_PUBLIC), None).unwrap(),
        ))
        .unwrap();
    verifier
        .register_ecdsa_profile(EcdsaProfileOptions::new(
            "es",
            HashStrength::Sha256,
            EcdsaKeyPair::from_pem(Some(P256_PUBLIC), None).unwrap(),
        ))
        .unwrap();

    for (issuer_profile, verifier_profile) in [("RS512", "rs"), ("ES256", "es")] {
        let token = issuer.encode(issuer_profile, &json!({ "sub": "a" })).unwrap();
        let decoded = verifier.decode(&token, None).unwrap();
        assert_eq!(decoded.signature.profile.as_deref(), Some(verifier_profile));

        assert!(matches!(
            verifier.encode(verifier_profile, &json!({})),
            Err(Error::Signature(SignatureError::MissingSigningKey))
        ));
    }
}

#[test]
fn rejected_key_material() {
    assert!(matches!(
        RsaKeyPair::from_pem(None, Some(RSA_1024)),
        Err(KeyError::RsaKeyTooSmall(1024))
    ));
    assert!(matches!(
        RsaKeyPair::from_pem(Some(RSA_PUBLIC), Some(RSA_B_PRIVATE)),
        Err(KeyError::Mismatch)
    ));

    let service = TokenService::new();
    let err = service
        .register_ecdsa_profile(EcdsaProfileOptions::new(
            "es",
            HashStrength::Sha256,
            ecdsa_key(P384_PRIVATE),
        ))
        .unwrap_err();
    assert!(matches!(err, Error::Key(KeyError::CurveMismatch { .. })));
    assert!(service.profile_names().is_empty());
}

#[test]
fn service_from_config() {
    let config = json!({
        "profiles": [
            {
                "family": "rsa",
                "name": "api",
                "hash": "sha256",
                "private_key_pem": RSA_PRIVATE,
                "header": { "kid": "api-1" }
            },
            {
                "family": "ecdsa",
                "name": "device",
                "hash": "sha256",
                "private_key_pem": P256_PRIVATE
            },
            {
                "family": "hmac",
                "name": "session",
                "hash": "sha384",
                "secret": "a shared secret"
            }
        ]
    });
    let service =
        TokenService::from_config(&ServiceConfig::from_json_str(&config.to_string()).unwrap())
            .unwrap();
    let hand_built = all_algorithms();

    let token = service.encode("api", &json!({ "sub": "a" })).unwrap();
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("api"));
    assert_eq!(decoded.header.get("kid"), Some(&json!("api-1")));
    // Same key, same algorithm.
    assert!(hand_built.decode(&token, Some("RS256")).unwrap().is_verified());

    let token = hand_built.encode("HS384", &json!({})).unwrap();
    assert!(service.decode(&token, Some("session")).unwrap().is_verified());

    let token = hand_built.encode("ES256", &json!({})).unwrap();
    let decoded = service.decode(&token, None).unwrap();
    assert_eq!(decoded.signature.profile.as_deref(), Some("device"));
}

#[test]
fn concurrent_use() {
    init_logger();
    let service = Arc::new(all_algorithms());

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let name = Algorithm::ALL[i % Algorithm::ALL.len()].as_str();
                for n in 0..10 {
                    let token = service.encode(name, &json!({ "n": n })).unwrap();
                    let decoded = service.decode(&token, None).unwrap();
                    assert_eq!(decoded.signature.profile.as_deref(), Some(name));
                    assert_eq!(decoded.payload.get("n"), Some(&json!(n)));
                }
            })
        })
        .collect();

    let registrar = {
        let service = Arc::clone(&service);
        thread::spawn(move || {
            for n in 0..20 {
                let name = format!("extra-{}", n);
                service
                    .register_hmac_profile(HmacProfileOptions::new(
                        name.clone(),
                        HashStrength::Sha256,
                        name.as_str(),
                    ))
                    .unwrap();
                if n % 2 == 0 {
                    service.remove_profile(&name);
                }
            }
        })
    };

    for worker in workers {
        worker.join().unwrap();
    }
    registrar.join().unwrap();
    assert_eq!(service.profile_names().len(), Algorithm::ALL.len() + 10);
}
