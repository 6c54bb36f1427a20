//! Handler errors and their HTTP mapping
//!
//! Bodies are plain text. Authentication failures answer 401 `Unauthorized`;
//! everything else answers 500 with the underlying error message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use vocab_auth::TokenError;
use vocab_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    /// Request body could not be read or decoded
    #[error("{0}")]
    BadPayload(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            // Client input errors share the 500 path with store failures
            ApiError::BadPayload(_)
            | ApiError::Store(_)
            | ApiError::Token(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Unauthorized => (status, "Unauthorized").into_response(),
            other => {
                error!("Request failed: {}", other);
                (status, format!("{}\n", other)).into_response()
            }
        }
    }
}
