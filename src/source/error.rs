use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Book names map to a single directory level.
    #[error("invalid book name: '{name}'")]
    InvalidBookName { name: String },
}

pub type SourceResult<T> = Result<T, SourceError>;
