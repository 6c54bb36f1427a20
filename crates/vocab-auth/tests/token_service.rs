//! Issue/verify contract of the session token service
//!
//! Uses the RSA fixtures under tests/fixtures.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use vocab_auth::{
    Algorithm, InvalidReason, KeyError, KeyKind, KeyPair, SessionClaims, TokenService,
    Verification, SESSION_IDENTITY, TOKEN_VALIDITY_SECS,
};

const PRIVATE_PEM: &[u8] = include_bytes!("fixtures/demo.rsa");
const PUBLIC_PEM: &[u8] = include_bytes!("fixtures/demo.rsa.pub");
const OTHER_PRIVATE_PEM: &[u8] = include_bytes!("fixtures/other.rsa");
const OTHER_PUBLIC_PEM: &[u8] = include_bytes!("fixtures/other.rsa.pub");

fn service() -> TokenService {
    let keys = KeyPair::from_pem(PRIVATE_PEM, PUBLIC_PEM).unwrap();
    TokenService::new(&keys).unwrap()
}

fn other_service() -> TokenService {
    let keys = KeyPair::from_pem(OTHER_PRIVATE_PEM, OTHER_PUBLIC_PEM).unwrap();
    TokenService::new(&keys).unwrap()
}

fn split(token: &str) -> (String, String, String) {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(parts.len(), 3, "compact JWS must have three segments");
    (
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
    )
}

#[test]
fn test_token_valid_until_expiry_instant() {
    let service = service();
    let issued_at = Utc::now();
    let token = service.issue(SESSION_IDENTITY, issued_at).unwrap();

    let fresh = service.verify_at(&token, issued_at);
    assert!(fresh.is_valid());
    assert_eq!(fresh.claims().unwrap().id, SESSION_IDENTITY);
    assert_eq!(
        fresh.claims().unwrap().exp,
        issued_at.timestamp() + TOKEN_VALIDITY_SECS
    );

    let almost = service.verify_at(&token, issued_at + Duration::seconds(TOKEN_VALIDITY_SECS - 1));
    assert!(almost.is_valid());

    let expired = service.verify_at(&token, issued_at + Duration::seconds(TOKEN_VALIDITY_SECS));
    assert_eq!(expired, Verification::Invalid(InvalidReason::Expired));
}

#[test]
fn test_token_issued_in_the_past_is_expired_now() {
    let service = service();
    let issued_at = Utc::now() - Duration::seconds(TOKEN_VALIDITY_SECS + 1);
    let token = service.issue(SESSION_IDENTITY, issued_at).unwrap();

    assert_eq!(
        service.verify(&token),
        Verification::Invalid(InvalidReason::Expired)
    );
}

#[test]
fn test_hs256_keyed_with_public_key_is_rejected() {
    // Classic confusion: HMAC "signed" with the server's public PEM
    let service = service();
    let claims = SessionClaims::new(SESSION_IDENTITY, Utc::now());
    let forged = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(PUBLIC_PEM),
    )
    .unwrap();

    assert_eq!(
        service.verify(&forged),
        Verification::Invalid(InvalidReason::AlgorithmMismatch)
    );
}

#[test]
fn test_other_rsa_algorithm_is_rejected() {
    let service = service();
    let claims = SessionClaims::new(SESSION_IDENTITY, Utc::now());
    let rs512 = encode(
        &Header::new(Algorithm::RS512),
        &claims,
        &EncodingKey::from_rsa_pem(PRIVATE_PEM).unwrap(),
    )
    .unwrap();

    assert_eq!(
        service.verify(&rs512),
        Verification::Invalid(InvalidReason::AlgorithmMismatch)
    );
}

#[test]
fn test_token_from_other_key_pair_is_rejected() {
    let token = other_service()
        .issue(SESSION_IDENTITY, Utc::now())
        .unwrap();

    assert_eq!(
        service().verify(&token),
        Verification::Invalid(InvalidReason::BadSignature)
    );
}

#[test]
fn test_swapped_payload_fails_signature() {
    let service = service();
    let now = Utc::now();
    let original = service.issue(SESSION_IDENTITY, now).unwrap();
    let extended = service
        .issue(SESSION_IDENTITY, now + Duration::days(30))
        .unwrap();

    let (header, _, signature) = split(&original);
    let (_, longer_payload, _) = split(&extended);
    let tampered = format!("{}.{}.{}", header, longer_payload, signature);

    assert_eq!(
        service.verify(&tampered),
        Verification::Invalid(InvalidReason::BadSignature)
    );
}

#[test]
fn test_flipped_signature_byte_is_rejected() {
    let service = service();
    let token = service.issue(SESSION_IDENTITY, Utc::now()).unwrap();
    let (header, payload, signature) = split(&token);

    let mut chars: Vec<char> = signature.chars().collect();
    let idx = chars.len() / 2;
    chars[idx] = if chars[idx] == 'A' { 'B' } else { 'A' };
    let tampered = format!("{}.{}.{}", header, payload, chars.into_iter().collect::<String>());

    assert!(!service.verify(&tampered).is_valid());
}

#[test]
fn test_truncated_token_is_rejected() {
    let service = service();
    let token = service.issue(SESSION_IDENTITY, Utc::now()).unwrap();
    let (header, payload, _) = split(&token);

    assert!(!service.verify(&format!("{}.{}", header, payload)).is_valid());
    assert!(!service.verify(&format!("{}.{}.", header, payload)).is_valid());
}

#[test]
fn test_malformed_private_key_fails_construction() {
    let keys = KeyPair::from_pem(b"definitely not pem".to_vec(), PUBLIC_PEM).unwrap();

    match TokenService::new(&keys) {
        Err(KeyError::InvalidPem { kind, .. }) => assert_eq!(kind, KeyKind::Private),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("garbage private key must be rejected"),
    }
}

#[test]
fn test_malformed_public_key_fails_construction() {
    let keys = KeyPair::from_pem(PRIVATE_PEM, b"-----BEGIN NOTHING-----".to_vec()).unwrap();

    assert!(matches!(
        TokenService::new(&keys),
        Err(KeyError::InvalidPem {
            kind: KeyKind::Public,
            ..
        })
    ));
}
