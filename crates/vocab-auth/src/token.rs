//! Session tokens (RS256 JWT)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::keys::{KeyError, KeyKind, KeyPair};

/// Identity embedded in every session token
pub const SESSION_IDENTITY: &str = "2134asdf43451dscfds32423ASDF";

/// Lifetime of the `exp` claim, in seconds (10 hours)
pub const TOKEN_VALIDITY_SECS: i64 = 36_000;

/// The only algorithm tokens are signed with or accepted under
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// Claims carried by a session token: `{"ID": ..., "exp": ...}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Identity
    #[serde(rename = "ID")]
    pub id: String,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(identity: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        let exp = issued_at + Duration::seconds(TOKEN_VALIDITY_SECS);

        Self {
            id: identity.into(),
            exp: exp.timestamp(),
        }
    }

    /// A token is usable strictly before `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Why a presented token was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// No token was presented at all
    Missing,
    /// Not a decodable JWT, or claims of the wrong shape
    Malformed,
    /// Header names an algorithm other than RS256
    AlgorithmMismatch,
    /// Signature does not match the public key
    BadSignature,
    /// `exp` is not in the future
    Expired,
}

/// Outcome of checking a token. Invalid tokens are a normal result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Valid(SessionClaims),
    Invalid(InvalidReason),
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid(_))
    }

    pub fn claims(&self) -> Option<&SessionClaims> {
        match self {
            Verification::Valid(claims) => Some(claims),
            Verification::Invalid(_) => None,
        }
    }
}

/// Issues and verifies session tokens with an RSA key pair
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Parse both PEM keys up front so a bad key fails startup, not a login.
    pub fn new(keys: &KeyPair) -> Result<Self, KeyError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(keys.private_pem()).map_err(|source| KeyError::InvalidPem {
                kind: KeyKind::Private,
                source,
            })?;
        let decoding_key =
            DecodingKey::from_rsa_pem(keys.public_pem()).map_err(|source| KeyError::InvalidPem {
                kind: KeyKind::Public,
                source,
            })?;

        // Pin RS256; expiry is checked against the caller's clock in verify_at
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Sign a fresh claim set for `identity`, expiring `TOKEN_VALIDITY_SECS` after `now`.
    pub fn issue(&self, identity: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SessionClaims::new(identity, now);
        let header = Header::new(TOKEN_ALGORITHM);

        encode(&header, &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Verification {
        self.verify_at(token, Utc::now())
    }

    /// Check algorithm, signature and expiry of `token` as of `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Verification {
        let header = match decode_header(token) {
            Ok(header) => header,
            Err(e) => {
                debug!("Rejecting undecodable token header: {}", e);
                return Verification::Invalid(InvalidReason::Malformed);
            }
        };

        if header.alg != TOKEN_ALGORITHM {
            debug!("Rejecting token signed with {:?}", header.alg);
            return Verification::Invalid(InvalidReason::AlgorithmMismatch);
        }

        let claims = match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejecting token: {}", e);
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => InvalidReason::BadSignature,
                    ErrorKind::InvalidAlgorithm => InvalidReason::AlgorithmMismatch,
                    _ => InvalidReason::Malformed,
                };
                return Verification::Invalid(reason);
            }
        };

        if claims.is_expired_at(now) {
            debug!("Rejecting token expired at {}", claims.expires_at());
            return Verification::Invalid(InvalidReason::Expired);
        }

        Verification::Valid(claims)
    }
}
