//! Error types shared by the persistence and configuration layers. The UI glue
//! wraps these in `anyhow` with extra context, but keeping typed errors here
//! lets callers tell a failed statement apart from a bad setting.

use std::io;
use std::path::PathBuf;

/// Anything that can go wrong while talking to the SQLite store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A statement failed: constraint violation, I/O inside SQLite, malformed
    /// query, or a row that could not be decoded.
    #[error("storage operation failed: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Problems with the environment-driven configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected one of 1/0, true/false, yes/no, on/off)")]
    InvalidFlag { key: String, value: String },

    #[error("could not locate home directory")]
    MissingHome,
}

pub type StoreResult<T> = Result<T, StoreError>;
