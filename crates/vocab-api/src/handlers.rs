use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::OpenApi;
use vocab_auth::{credentials_match, SessionClaims, SESSION_IDENTITY};
use vocab_store::NewEntry;

use crate::error::ApiError;
use crate::middleware::session_cookie;
use crate::models::*;
use crate::{ApiDoc, AppState};

/// Log in with the admin credentials
///
/// Sets the `token` session cookie and also returns the raw token as the body.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token (also set as the `token` cookie)", body = String),
        (status = 401, description = "Wrong login or password", body = String),
        (status = 500, description = "Unreadable request body", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let credentials: LoginRequest = decode_body(body)?;

    if !credentials_match(&credentials.login, &credentials.password) {
        warn!("Rejected login attempt for {:?}", credentials.login);
        return Err(ApiError::Unauthorized);
    }

    let now = Utc::now();
    let token = state.tokens.issue(SESSION_IDENTITY, now)?;
    let cookie = session_cookie(&token, now)?;

    info!("Issued session token for {:?}", credentials.login);

    Ok(([(header::SET_COOKIE, cookie)], token).into_response())
}

/// List all entries
#[utoipa::path(
    get,
    path = "/api/entry/",
    responses(
        (status = 200, description = "All entries", body = Vec<Entry>),
        (status = 500, description = "Store error", body = String)
    ),
    tag = "entries"
)]
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    debug!("Listing entries");

    let entries = state.store.find_all().await?;

    Ok(Json(entries.into_iter().map(Entry::from).collect()))
}

/// Create an entry (requires the session cookie)
#[utoipa::path(
    post,
    path = "/api/entry/",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = String),
        (status = 401, description = "Missing, invalid or expired session token", body = String),
        (status = 500, description = "Unreadable body or store error", body = String)
    ),
    tag = "entries"
)]
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionClaims>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let request: CreateEntryRequest = decode_body(body)?;

    let entry = state
        .store
        .insert(NewEntry {
            word: request.word,
            translation: request.translation,
        })
        .await?;

    info!("Created entry {} (session {})", entry.id, session.id);

    Ok((StatusCode::CREATED, "Created"))
}

/// Delete an entry by id
#[utoipa::path(
    delete,
    path = "/api/entry/{id}",
    params(
        ("id" = String, Path, description = "Entry ID")
    ),
    responses(
        (status = 202, description = "Entry deleted", body = String),
        (status = 500, description = "Invalid id, unknown id or store error", body = String)
    ),
    tag = "entries"
)]
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    info!("Deleting entry: {}", id);

    state.store.delete_by_id(&id).await?;

    Ok((StatusCode::ACCEPTED, "Accepted"))
}

/// OpenAPI document for this API
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Decode a JSON body, reporting read and parse failures with their detail.
fn decode_body<T: DeserializeOwned>(body: Result<Bytes, BytesRejection>) -> Result<T, ApiError> {
    let body = body.map_err(|e| ApiError::BadPayload(e.body_text()))?;

    serde_json::from_slice(&body).map_err(|e| ApiError::BadPayload(e.to_string()))
}
