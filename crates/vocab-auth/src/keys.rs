//! RSA key material loading
//!
//! The server signs with the private key and verifies with the public key.
//! Both are PEM files read once at startup; any failure here is fatal.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Which half of the key pair an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Private,
    Public,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Private => f.write_str("private"),
            KeyKind::Public => f.write_str("public"),
        }
    }
}

/// Key material errors
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read {kind} key from {}: {source}", path.display())]
    Read {
        kind: KeyKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{kind} key material is empty")]
    Empty { kind: KeyKind },

    #[error("{kind} key is not a valid RSA PEM: {source}")]
    InvalidPem {
        kind: KeyKind,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// PEM-encoded RSA key pair, immutable once loaded
#[derive(Clone)]
pub struct KeyPair {
    private_pem: Vec<u8>,
    public_pem: Vec<u8>,
}

impl KeyPair {
    /// Read both keys from disk.
    ///
    /// Fails if either file cannot be read or is empty.
    pub fn load(
        private_path: impl AsRef<Path>,
        public_path: impl AsRef<Path>,
    ) -> Result<Self, KeyError> {
        let private_path = private_path.as_ref();
        let public_path = public_path.as_ref();

        let private_pem = read_key(KeyKind::Private, private_path)?;
        let public_pem = read_key(KeyKind::Public, public_path)?;

        let keys = Self::from_pem(private_pem, public_pem)?;
        info!(
            "Loaded key pair (private: {}, public: {})",
            private_path.display(),
            public_path.display()
        );

        Ok(keys)
    }

    pub fn from_pem(
        private_pem: impl Into<Vec<u8>>,
        public_pem: impl Into<Vec<u8>>,
    ) -> Result<Self, KeyError> {
        let private_pem = private_pem.into();
        let public_pem = public_pem.into();

        if private_pem.iter().all(u8::is_ascii_whitespace) {
            return Err(KeyError::Empty {
                kind: KeyKind::Private,
            });
        }
        if public_pem.iter().all(u8::is_ascii_whitespace) {
            return Err(KeyError::Empty {
                kind: KeyKind::Public,
            });
        }

        Ok(Self {
            private_pem,
            public_pem,
        })
    }

    pub fn private_pem(&self) -> &[u8] {
        &self.private_pem
    }

    pub fn public_pem(&self) -> &[u8] {
        &self.public_pem
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_pem", &"<redacted>")
            .field("public_pem_len", &self.public_pem.len())
            .finish()
    }
}

fn read_key(kind: KeyKind, path: &Path) -> Result<Vec<u8>, KeyError> {
    fs::read(path).map_err(|source| KeyError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
