//! Vocab server startup
//!
//! Wires the signing keys, the entry store and the HTTP API together. Any
//! failure before the listener is up aborts startup.

pub mod config;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use vocab_api::ApiServer;
use vocab_auth::{KeyPair, TokenService};
use vocab_store::{EntryStore, SeaOrmEntryStore};

pub use config::{init_logging, ServerArgs};

/// Load keys, open and migrate the database, then serve until stopped.
pub async fn run(args: ServerArgs) -> Result<()> {
    let keys = KeyPair::load(&args.private_key, &args.public_key)
        .context("Failed to load token signing keys")?;
    let tokens = TokenService::new(&keys).context("Failed to parse token signing keys")?;

    let db = vocab_store::connect_with_timeout(&args.database_url, args.db_timeout())
        .await
        .context("Failed to connect to database")?;
    vocab_store::migrate(&db)
        .await
        .context("Failed to run database migrations")?;

    let store: Arc<dyn EntryStore> = Arc::new(SeaOrmEntryStore::new(db));
    let server = ApiServer::new(args.api_config(), tokens, store);

    if args.addr {
        let listener = TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("Failed to bind an ephemeral port")?;
        let local_addr = listener.local_addr()?;
        write_port_file(&args.port_file, local_addr)?;

        server.serve(listener).await
    } else {
        server.start().await
    }
}

/// Record the bound address (`127.0.0.1:PORT`) so a supervising process can find it.
pub fn write_port_file(path: &Path, addr: SocketAddr) -> Result<()> {
    std::fs::write(path, addr.to_string())
        .with_context(|| format!("Failed to write port file {}", path.display()))?;

    info!("Wrote bound address {} to {}", addr, path.display());
    Ok(())
}
