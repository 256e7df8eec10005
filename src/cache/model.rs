use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::constants::{MODEL_RESPONSE_NAMESPACE, MODEL_RESPONSE_TTL_SECS};
use crate::hashing::{chapter_key, hash_content, model_response_key};

use super::repository::CacheRepository;
use super::store::{FsRecordStore, RecordStore};
use super::types::{CacheLookup, CacheStats};

/// Which model workflow a response belongs to. Phases never share records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelPhase {
    /// Choosing which candidates to keep.
    Selection,
    /// Writing cross-reference annotations for a chapter.
    Annotation,
}

impl ModelPhase {
    pub const ALL: [ModelPhase; 2] = [ModelPhase::Selection, ModelPhase::Annotation];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelPhase::Selection => "selection",
            ModelPhase::Annotation => "annotation",
        }
    }
}

impl std::fmt::Display for ModelPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPhase(pub String);

impl std::fmt::Display for UnknownPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown model phase '{}'", self.0)
    }
}

impl std::error::Error for UnknownPhase {}

impl std::str::FromStr for ModelPhase {
    type Err = UnknownPhase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelPhase::ALL
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}

/// Cached model invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponseRecord {
    pub phase: ModelPhase,
    pub chapter_number: u32,
    /// Full hash of the prompt text.
    pub prompt_hash: String,
    pub response_text: String,
    /// JSON parsed out of `response_text`, or `null`.
    pub parsed_data: serde_json::Value,
    pub model_id: String,
    pub tokens_used: u64,
}

impl ModelResponseRecord {
    pub fn key(&self) -> String {
        chapter_key(self.chapter_number, &self.prompt_hash)
    }
}

/// Tier 2 cache: model responses keyed by phase, chapter and prompt, valid for 30 days.
#[derive(Debug)]
pub struct ModelResponseCache {
    selection: CacheRepository<ModelResponseRecord>,
    annotation: CacheRepository<ModelResponseRecord>,
}

impl ModelResponseCache {
    /// One store per phase.
    pub fn new(
        selection_store: Arc<dyn RecordStore>,
        annotation_store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_ttl(
            selection_store,
            annotation_store,
            clock,
            MODEL_RESPONSE_TTL_SECS,
        )
    }

    pub fn with_ttl(
        selection_store: Arc<dyn RecordStore>,
        annotation_store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        ttl_seconds: u64,
    ) -> Self {
        let namespace = |phase: ModelPhase| format!("{}/{}", MODEL_RESPONSE_NAMESPACE, phase);
        Self {
            selection: CacheRepository::new(
                namespace(ModelPhase::Selection),
                selection_store,
                Arc::clone(&clock),
                ttl_seconds,
            ),
            annotation: CacheRepository::new(
                namespace(ModelPhase::Annotation),
                annotation_store,
                clock,
                ttl_seconds,
            ),
        }
    }

    /// Filesystem-backed cache under `<cache_dir>/model_responses/<phase>`.
    pub fn open(cache_dir: &Path, clock: Arc<dyn Clock>, ttl_seconds: u64) -> Self {
        let root = cache_dir.join(MODEL_RESPONSE_NAMESPACE);
        Self::with_ttl(
            Arc::new(FsRecordStore::new(root.join(ModelPhase::Selection.as_str()))),
            Arc::new(FsRecordStore::new(root.join(ModelPhase::Annotation.as_str()))),
            clock,
            ttl_seconds,
        )
    }

    fn repo(&self, phase: ModelPhase) -> &CacheRepository<ModelResponseRecord> {
        match phase {
            ModelPhase::Selection => &self.selection,
            ModelPhase::Annotation => &self.annotation,
        }
    }

    /// Looks up the response for exactly this prompt text.
    pub fn get(
        &self,
        phase: ModelPhase,
        chapter_number: u32,
        prompt: &str,
    ) -> CacheLookup<ModelResponseRecord> {
        let key = model_response_key(chapter_number, prompt);
        self.repo(phase).get(&key, &hash_content(prompt))
    }

    /// Stores under the record's own phase, chapter and prompt hash.
    pub fn set(&self, record: &ModelResponseRecord) -> bool {
        self.repo(record.phase)
            .set(&record.key(), record, &record.prompt_hash)
    }

    pub fn invalidate(&self, phase: ModelPhase, chapter_number: u32, prompt: &str) -> bool {
        self.repo(phase)
            .invalidate(&model_response_key(chapter_number, prompt))
    }

    pub fn contains(&self, phase: ModelPhase, chapter_number: u32, prompt: &str) -> bool {
        self.repo(phase)
            .contains(&model_response_key(chapter_number, prompt))
    }

    /// Sweeps both phases.
    pub fn clear_expired(&self) -> usize {
        ModelPhase::ALL
            .iter()
            .map(|&phase| self.repo(phase).clear_expired())
            .sum()
    }

    pub fn clear(&self) -> usize {
        ModelPhase::ALL
            .iter()
            .map(|&phase| self.repo(phase).clear())
            .sum()
    }

    /// Deletes every record of one phase; the other phase is untouched.
    pub fn clear_phase(&self, phase: ModelPhase) -> usize {
        self.repo(phase).clear()
    }

    pub fn stats(&self) -> CacheStats {
        ModelPhase::ALL
            .iter()
            .map(|&phase| self.repo(phase).stats())
            .fold(CacheStats::default(), |acc, s| acc + s)
    }

    pub fn phase_stats(&self, phase: ModelPhase) -> CacheStats {
        self.repo(phase).stats()
    }
}
