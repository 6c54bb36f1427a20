//! Session authentication for the vocabulary server
//!
//! Key material is loaded once at startup ([`KeyPair`]), session tokens are
//! RS256-signed JWTs minted and checked by [`TokenService`].

pub mod credentials;
pub mod keys;
pub mod token;

pub use credentials::{credentials_match, ADMIN_LOGIN, ADMIN_PASSWORD};
pub use keys::{KeyError, KeyKind, KeyPair};
pub use token::{
    InvalidReason, SessionClaims, TokenError, TokenService, Verification, SESSION_IDENTITY,
    TOKEN_ALGORITHM, TOKEN_VALIDITY_SECS,
};

// Re-export useful types
pub use jsonwebtoken::Algorithm;
