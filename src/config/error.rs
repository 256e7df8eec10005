//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An integer variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    IntParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// A float variable could not be parsed.
    #[error("failed to parse {name}='{value}': {source}")]
    FloatParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// A boolean variable was not one of the accepted spellings.
    #[error("invalid boolean {name}='{value}': expected true/false/1/0/yes/no")]
    InvalidBool { name: &'static str, value: String },

    /// Unknown selection mode.
    #[error("invalid mode '{value}': expected statistics, hybrid or model")]
    InvalidMode { value: String },

    /// A value is outside its allowed range.
    #[error("{name} out of range: {reason}")]
    OutOfRange { name: &'static str, reason: String },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
