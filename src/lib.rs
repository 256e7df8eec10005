//! Xref library crate (used by the CLI binary and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Engine configuration
//! - [`SelectionOrchestrator`], [`SelectionMode`] - End-to-end chapter selection
//! - [`PrefilterResult`], [`ModelResponseRecord`] - Cached payloads
//!
//! ## Relevance & Ranking
//! - [`TaxonomyRegistry`], [`CorpusEntry`] - Companion-corpus registry
//! - [`RelevanceScorer`], [`ConceptSet`] - Book-level scoring and cascades
//! - [`SimilarityRanker`] - Chapter-level TF-IDF ranking
//!
//! ## Caching
//! - [`StatisticalPrefilterCache`] (7 days), [`ModelResponseCache`] (30 days)
//! - [`CacheRepository`], [`CacheLookup`] - Shared TTL and content-hash validation
//! - [`RecordStore`], [`FsRecordStore`] - Record storage backends
//!
//! ## Collaborators
//! - [`ConceptExtractor`], [`ChapterSource`], [`ModelClient`] - External seams,
//!   with built-in [`KeywordExtractor`], [`DirectoryChapterSource`] and
//!   [`GenaiModelClient`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod clock;
pub mod config;
pub mod constants;
pub mod extract;
pub mod hashing;
pub mod model;
pub mod relevance;
pub mod selection;
pub mod similarity;
pub mod source;
pub mod taxonomy;

/// Error type carried unchanged from external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub use cache::{
    CacheEntryMeta, CacheLookup, CacheRecord, CacheRepository, CacheStats, CacheStatus,
    FsRecordStore, MissReason, ModelPhase, ModelResponseCache, ModelResponseRecord,
    PrefilterResult, RecordStore, StatisticalPrefilterCache, StoreError,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::MemoryRecordStore;

#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};

pub use config::{Config, ConfigError};

pub use extract::{ConceptExtractor, Extraction, KeywordExtractor};
#[cfg(any(test, feature = "mock"))]
pub use extract::MockConceptExtractor;

pub use hashing::{hash_content, model_response_key, prefilter_key, short_hash};

pub use model::{GenaiModelClient, ModelClient, ModelError, ModelReply, parse_response_json};
#[cfg(any(test, feature = "mock"))]
pub use model::MockModelClient;

pub use relevance::{ConceptSet, RecommendOptions, RelevanceError, RelevanceScorer};

pub use selection::{
    Collaborators, ModelInvocation, PromptBuilder, SelectionConfig, SelectionError,
    SelectionMode, SelectionOrchestrator, SelectionOutcome,
};

pub use similarity::{
    CandidateChapter, CandidateRanker, ChapterCandidate, RankQuery, RankerConfig,
    SimilarityRanker,
};
#[cfg(any(test, feature = "mock"))]
pub use similarity::CountingRanker;

pub use source::{ChapterSource, DirectoryChapterSource};
#[cfg(any(test, feature = "mock"))]
pub use source::MockChapterSource;

pub use taxonomy::{CorpusEntry, RegistryError, TaxonomyRegistry, Tier, default_registry};
