//! Server configuration
//!
//! Every setting can come from a flag or an environment variable; the
//! defaults reproduce the fixed layout the server has always used (keys and
//! static files relative to the working directory, port 3000).

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vocab_api::ApiServerConfig;

/// Vocab - word/translation entries API server
#[derive(Parser, Debug, Clone)]
#[command(name = "vocab")]
#[command(about = "Serve the vocabulary entries API", long_about = None)]
#[command(version)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "VOCAB_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Find an open port on 127.0.0.1 and write the bound address to --port-file
    #[arg(long)]
    pub addr: bool,

    /// Where --addr records the bound address
    #[arg(long, env = "VOCAB_PORT_FILE", default_value = "final-port.txt")]
    pub port_file: PathBuf,

    /// Database URL (SQLite or PostgreSQL)
    #[arg(
        long,
        env = "VOCAB_DATABASE_URL",
        default_value = vocab_store::DEFAULT_DATABASE_URL
    )]
    pub database_url: String,

    /// Bound, in seconds, on connecting to the database and on each pooled checkout
    #[arg(long, env = "VOCAB_DB_TIMEOUT_SECS", default_value = "10")]
    pub db_timeout_secs: u64,

    /// RSA private key (PEM) used to sign session tokens
    #[arg(long, env = "VOCAB_PRIVATE_KEY", default_value = "./demo.rsa")]
    pub private_key: PathBuf,

    /// RSA public key (PEM) used to verify session tokens
    #[arg(long, env = "VOCAB_PUBLIC_KEY", default_value = "./demo.rsa.pub")]
    pub public_key: PathBuf,

    /// Directory served for every non-API path
    #[arg(long, env = "VOCAB_STATIC_DIR", default_value = "./static/")]
    pub static_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl ServerArgs {
    pub fn api_config(&self) -> ApiServerConfig {
        ApiServerConfig {
            bind_addr: self.bind,
            static_dir: self.static_dir.clone(),
        }
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }
}

/// Setup logging; `RUST_LOG` directives win over `log_level`
pub fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = ServerArgs::try_parse_from(["vocab"]).unwrap();

        assert_eq!(args.bind, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert!(!args.addr);
        assert_eq!(args.port_file, PathBuf::from("final-port.txt"));
        assert_eq!(args.private_key, PathBuf::from("./demo.rsa"));
        assert_eq!(args.public_key, PathBuf::from("./demo.rsa.pub"));
        assert_eq!(args.static_dir, PathBuf::from("./static/"));
        assert_eq!(args.db_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = ServerArgs::try_parse_from([
            "vocab",
            "--addr",
            "--bind",
            "127.0.0.1:8081",
            "--database-url",
            "sqlite::memory:",
            "--private-key",
            "/etc/vocab/key.pem",
            "--public-key",
            "/etc/vocab/key.pub.pem",
            "--static-dir",
            "/srv/www",
            "--db-timeout-secs",
            "3",
        ])
        .unwrap();

        assert!(args.addr);
        assert_eq!(args.database_url, "sqlite::memory:");
        assert_eq!(args.db_timeout(), Duration::from_secs(3));

        let api = args.api_config();
        assert_eq!(api.bind_addr.port(), 8081);
        assert_eq!(api.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn test_rejects_bad_bind_address() {
        assert!(ServerArgs::try_parse_from(["vocab", "--bind", "localhost"]).is_err());
    }
}
