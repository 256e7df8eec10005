use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cache::{CacheStatus, ModelResponseRecord, PrefilterResult};
use crate::constants::{DEFAULT_CASCADE_DEPTH, DEFAULT_MAX_BOOKS, DEFAULT_MIN_RELEVANCE};
use crate::relevance::RecommendOptions;

/// How much of the pipeline runs for a chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Ranking only, no model call.
    #[serde(rename = "statistics")]
    StatisticsOnly,
    /// Ranking, then a model call over the ranked candidates.
    #[default]
    #[serde(rename = "hybrid")]
    Hybrid,
    /// Every chapter of every registered book goes to the model unranked.
    #[serde(rename = "model")]
    ModelOnly,
}

impl SelectionMode {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::StatisticsOnly => "statistics",
            SelectionMode::Hybrid => "hybrid",
            SelectionMode::ModelOnly => "model",
        }
    }

    #[inline]
    pub fn uses_model(&self) -> bool {
        !matches!(self, SelectionMode::StatisticsOnly)
    }

    #[inline]
    pub fn uses_ranking(&self) -> bool {
        !matches!(self, SelectionMode::ModelOnly)
    }
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl std::fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown selection mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for SelectionMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "statistics" | "statistics-only" | "stats" => Ok(SelectionMode::StatisticsOnly),
            "hybrid" => Ok(SelectionMode::Hybrid),
            "model" | "model-only" => Ok(SelectionMode::ModelOnly),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Book-level selection knobs.
pub struct SelectionConfig {
    pub min_relevance: f32,
    pub max_books: usize,
    pub include_cascades: bool,
    pub cascade_depth: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            min_relevance: DEFAULT_MIN_RELEVANCE,
            max_books: DEFAULT_MAX_BOOKS,
            include_cascades: true,
            cascade_depth: DEFAULT_CASCADE_DEPTH,
        }
    }
}

impl SelectionConfig {
    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            min_relevance: self.min_relevance,
            include_cascades: self.include_cascades,
            max_results: self.max_books,
            cascade_depth: self.cascade_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// A model response and whether it came from the cache.
pub struct ModelInvocation {
    pub record: ModelResponseRecord,
    pub cache: CacheStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Everything `select_and_enhance` produced for one chapter.
pub struct SelectionOutcome {
    pub prefilter: PrefilterResult,
    pub prefilter_cache: CacheStatus,
    /// `None` in statistics-only mode.
    pub model: Option<ModelInvocation>,
}
