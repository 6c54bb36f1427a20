//! Session cookie middleware
//!
//! The session token travels in an HTTP-only cookie named `token`. Routes
//! wrapped with [`require_session`] only run when that cookie holds a valid
//! token; the verified [`SessionClaims`] are then available to the handler via
//! Axum's `Extension`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;
use vocab_auth::{InvalidReason, SessionClaims, Verification};

use crate::error::ApiError;
use crate::AppState;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

/// Extract the session token from the request's `Cookie` headers.
///
/// Returns `None` when no `token` cookie is present. A double-quoted value is
/// returned without its quotes.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let prefix = format!("{}=", SESSION_COOKIE);

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(|cookie| cookie.trim())
        .find_map(|cookie| cookie.strip_prefix(prefix.as_str()))
        .map(|value| {
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
        })
}

/// Build the `Set-Cookie` value for a freshly issued token.
///
/// The cookie outlives the token: it expires one day after `issued_at`, while
/// the token's own `exp` is ten hours out.
pub fn session_cookie(token: &str, issued_at: DateTime<Utc>) -> Result<HeaderValue, ApiError> {
    let expires = issued_at + Duration::days(1);
    let cookie = format!(
        "{}={}; Path=/; Expires={}; HttpOnly",
        SESSION_COOKIE,
        token,
        expires.format("%a, %d %b %Y %H:%M:%S GMT")
    );

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::Internal(format!("invalid session cookie: {}", e)))
}

/// Authentication middleware that validates the session cookie
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - The `token` cookie is missing
/// - The token is malformed, signed with another key or algorithm, or expired
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let verification = match session_token(request.headers()) {
        Some(token) => state.tokens.verify(token),
        None => Verification::Invalid(InvalidReason::Missing),
    };

    match verification {
        Verification::Valid(claims) => {
            request.extensions_mut().insert::<SessionClaims>(claims);
            Ok(next.run(request).await)
        }
        Verification::Invalid(reason) => {
            debug!(
                "Rejecting {} {}: session token {:?}",
                request.method(),
                request.uri(),
                reason
            );
            Err(ApiError::Unauthorized)
        }
    }
}
