//! HTTP API for vocabulary entries
//!
//! Login issues a session cookie; entry creation requires it. Paths the API
//! does not claim are served from the static directory.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use vocab_auth::TokenService;
use vocab_store::EntryStore;

pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub tokens: TokenService,
    pub store: Arc<dyn EntryStore>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vocabulary API",
        version = "0.1.0",
        description = "Word/translation entries with a cookie-based admin session"
    ),
    paths(
        handlers::login,
        handlers::list_entries,
        handlers::create_entry,
        handlers::delete_entry,
    ),
    components(
        schemas(
            models::Entry,
            models::CreateEntryRequest,
            models::LoginRequest,
        )
    ),
    tags(
        (name = "auth", description = "Session login"),
        (name = "entries", description = "Vocabulary entry endpoints")
    )
)]
pub struct ApiDoc;

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Directory served for every path the API does not claim
    pub static_dir: PathBuf,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            static_dir: PathBuf::from("./static/"),
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, tokens: TokenService, store: Arc<dyn EntryStore>) -> Self {
        let state = Arc::new(AppState { tokens, store });

        Self { config, state }
    }

    /// Build the router with all routes
    ///
    /// Only entry creation sits behind the session cookie; listing and
    /// deleting entries are open.
    pub fn build_router(&self) -> Router {
        let session_gate =
            axum_middleware::from_fn_with_state(self.state.clone(), middleware::require_session);

        let api_router = Router::new()
            .route("/login", post(handlers::login))
            .route(
                "/api/entry/",
                get(handlers::list_entries)
                    .merge(post(handlers::create_entry).route_layer(session_gate)),
            )
            .route("/api/entry/{id}", delete(handlers::delete_entry))
            .route("/api/openapi.json", get(handlers::openapi_json))
            .with_state(self.state.clone());

        api_router
            .fallback_service(ServeDir::new(&self.config.static_dir))
            .layer(TraceLayer::new_for_http())
    }

    /// Bind the configured address and serve until the process stops
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        let local_addr = listener.local_addr()?;
        info!("Starting API server on {}", local_addr);
        info!("Static files: {}", self.config.static_dir.display());
        info!("OpenAPI document: http://{}/api/openapi.json", local_addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
