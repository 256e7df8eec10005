//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `XREF_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_MAX_BOOKS, DEFAULT_MAX_FEATURES, DEFAULT_MIN_RELEVANCE, DEFAULT_MIN_SIMILARITY,
    DEFAULT_MODEL, DEFAULT_TOP_N, MODEL_RESPONSE_TTL_SECS, PREFILTER_TTL_SECS,
};
use crate::selection::{SelectionConfig, SelectionMode};
use crate::similarity::RankerConfig;

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `XREF_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Root directory of both cache tiers. Default: `./.cache/xref`.
    pub cache_dir: PathBuf,

    /// Directory holding one sub-directory of chapter files per companion book.
    pub corpus_dir: PathBuf,

    /// Default pipeline mode. Default: `hybrid`.
    pub mode: SelectionMode,

    /// Max chapter candidates kept after ranking. Default: `15`.
    pub top_n: usize,

    /// Candidates scoring below this are dropped. Default: `0.1`.
    pub min_similarity: f32,

    /// Vocabulary cap of the TF-IDF space. Default: `1000`.
    pub max_features: usize,

    /// Corpus entries scoring below this are not recommended. Default: `0.1`.
    pub min_relevance: f32,

    /// Max companion books materialized per chapter. Default: `6`.
    pub max_books: usize,

    /// Follow cascade edges of recommended books. Default: `true`.
    pub include_cascades: bool,

    /// Model identifier passed to the model client.
    pub model: String,

    pub prefilter_ttl_secs: u64,

    pub model_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./.cache/xref"),
            corpus_dir: PathBuf::from("./corpus"),
            mode: SelectionMode::default(),
            top_n: DEFAULT_TOP_N,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_features: DEFAULT_MAX_FEATURES,
            min_relevance: DEFAULT_MIN_RELEVANCE,
            max_books: DEFAULT_MAX_BOOKS,
            include_cascades: true,
            model: DEFAULT_MODEL.to_string(),
            prefilter_ttl_secs: PREFILTER_TTL_SECS,
            model_ttl_secs: MODEL_RESPONSE_TTL_SECS,
        }
    }
}

impl Config {
    const ENV_CACHE_DIR: &'static str = "XREF_CACHE_DIR";
    const ENV_CORPUS_DIR: &'static str = "XREF_CORPUS_DIR";
    const ENV_MODE: &'static str = "XREF_MODE";
    const ENV_TOP_N: &'static str = "XREF_TOP_N";
    const ENV_MIN_SIMILARITY: &'static str = "XREF_MIN_SIMILARITY";
    const ENV_MAX_FEATURES: &'static str = "XREF_MAX_FEATURES";
    const ENV_MIN_RELEVANCE: &'static str = "XREF_MIN_RELEVANCE";
    const ENV_MAX_BOOKS: &'static str = "XREF_MAX_BOOKS";
    const ENV_INCLUDE_CASCADES: &'static str = "XREF_INCLUDE_CASCADES";
    const ENV_MODEL: &'static str = "XREF_MODEL";
    const ENV_PREFILTER_TTL_SECS: &'static str = "XREF_PREFILTER_TTL_SECS";
    const ENV_MODEL_TTL_SECS: &'static str = "XREF_MODEL_TTL_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mode = match Self::read_env(Self::ENV_MODE) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidMode { value })?,
            None => defaults.mode,
        };

        Ok(Self {
            cache_dir: Self::parse_path_from_env(Self::ENV_CACHE_DIR, defaults.cache_dir),
            corpus_dir: Self::parse_path_from_env(Self::ENV_CORPUS_DIR, defaults.corpus_dir),
            mode,
            top_n: Self::parse_usize_from_env(Self::ENV_TOP_N, defaults.top_n)?,
            min_similarity: Self::parse_f32_from_env(
                Self::ENV_MIN_SIMILARITY,
                defaults.min_similarity,
            )?,
            max_features: Self::parse_usize_from_env(Self::ENV_MAX_FEATURES, defaults.max_features)?,
            min_relevance: Self::parse_f32_from_env(
                Self::ENV_MIN_RELEVANCE,
                defaults.min_relevance,
            )?,
            max_books: Self::parse_usize_from_env(Self::ENV_MAX_BOOKS, defaults.max_books)?,
            include_cascades: Self::parse_bool_from_env(
                Self::ENV_INCLUDE_CASCADES,
                defaults.include_cascades,
            )?,
            model: Self::read_env(Self::ENV_MODEL).unwrap_or(defaults.model),
            prefilter_ttl_secs: Self::parse_u64_from_env(
                Self::ENV_PREFILTER_TTL_SECS,
                defaults.prefilter_ttl_secs,
            )?,
            model_ttl_secs: Self::parse_u64_from_env(
                Self::ENV_MODEL_TTL_SECS,
                defaults.model_ttl_secs,
            )?,
        })
    }

    /// Validates ranges and paths (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_dir.exists() && !self.cache_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.cache_dir.clone(),
            });
        }

        Self::check_unit_interval("min_similarity", self.min_similarity)?;
        Self::check_unit_interval("min_relevance", self.min_relevance)?;
        Self::check_positive("top_n", self.top_n as u64)?;
        Self::check_positive("max_features", self.max_features as u64)?;
        Self::check_positive("max_books", self.max_books as u64)?;
        Self::check_positive("prefilter_ttl_secs", self.prefilter_ttl_secs)?;
        Self::check_positive("model_ttl_secs", self.model_ttl_secs)?;

        Ok(())
    }

    /// Ranker settings derived from this configuration.
    pub fn ranker_config(&self) -> RankerConfig {
        RankerConfig {
            top_n: self.top_n,
            min_similarity: self.min_similarity,
            max_features: self.max_features,
            ..RankerConfig::default()
        }
    }

    /// Orchestrator settings derived from this configuration.
    pub fn selection_config(&self) -> SelectionConfig {
        SelectionConfig {
            min_relevance: self.min_relevance,
            max_books: self.max_books,
            include_cascades: self.include_cascades,
            ..SelectionConfig::default()
        }
    }

    fn check_unit_interval(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::OutOfRange {
                name,
                reason: format!("{} is not within [0, 1]", value),
            });
        }
        Ok(())
    }

    fn check_positive(name: &'static str, value: u64) -> Result<(), ConfigError> {
        if value == 0 {
            return Err(ConfigError::OutOfRange {
                name,
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    fn read_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        Self::read_env(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match Self::read_env(name) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(default),
        }
    }

    fn parse_u64_from_env(name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match Self::read_env(name) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(default),
        }
    }

    fn parse_f32_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match Self::read_env(name) {
            Some(value) => value
                .parse()
                .map_err(|e| ConfigError::FloatParseError {
                    name,
                    value,
                    source: e,
                }),
            None => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match Self::read_env(name) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool { name, value }),
            },
            None => Ok(default),
        }
    }
}
