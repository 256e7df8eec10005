use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors returned by record stores.
///
/// These never escape the cache repositories; they are logged and turned into misses.
pub enum StoreError {
    /// IO error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage root path is missing/unavailable.
    #[error("storage path unavailable: {path}")]
    Unavailable {
        /// Path that was unavailable.
        path: PathBuf,
    },

    /// Key is empty or would escape the namespace directory.
    #[error("invalid record key: '{key}'")]
    InvalidKey { key: String },

    /// Backend refused the write.
    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Convenience result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;
