use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::constants::{PREFILTER_NAMESPACE, PREFILTER_TTL_SECS};
use crate::hashing::{hash_content, prefilter_key};
use crate::selection::SelectionMode;
use crate::similarity::ChapterCandidate;

use super::repository::CacheRepository;
use super::store::{FsRecordStore, RecordStore};
use super::types::{CacheLookup, CacheStats};

/// Output of the statistical pre-filter for one source chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefilterResult {
    pub source_chapter_number: u32,
    pub source_chapter_title: String,
    pub keywords: Vec<String>,
    pub concepts: Vec<String>,
    pub summary: String,
    pub candidates: Vec<ChapterCandidate>,
    pub total_candidates_scored: usize,
    /// Epoch seconds at which the result was produced.
    pub timestamp: i64,
    pub mode: SelectionMode,
    pub processing_time_ms: u64,
}

/// Tier 1 cache: ranked candidates per source chapter, valid for a week.
///
/// Keyed by `chapter_{n}_{hash8(text)}` and validated against the full text hash,
/// so any edit to the chapter turns the next lookup into a miss.
#[derive(Debug)]
pub struct StatisticalPrefilterCache {
    repo: CacheRepository<PrefilterResult>,
}

impl StatisticalPrefilterCache {
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(store, clock, PREFILTER_TTL_SECS)
    }

    pub fn with_ttl(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>, ttl_seconds: u64) -> Self {
        Self {
            repo: CacheRepository::new(PREFILTER_NAMESPACE, store, clock, ttl_seconds),
        }
    }

    /// Filesystem-backed cache under `<cache_dir>/prefilter`.
    pub fn open(cache_dir: &Path, clock: Arc<dyn Clock>, ttl_seconds: u64) -> Self {
        let store = FsRecordStore::new(cache_dir.join(PREFILTER_NAMESPACE));
        Self::with_ttl(Arc::new(store), clock, ttl_seconds)
    }

    #[inline]
    pub fn key_for(chapter_number: u32, source_text: &str) -> String {
        prefilter_key(chapter_number, source_text)
    }

    pub fn get(&self, chapter_number: u32, source_text: &str) -> CacheLookup<PrefilterResult> {
        let key = Self::key_for(chapter_number, source_text);
        self.repo.get(&key, &hash_content(source_text))
    }

    /// Stores under the key derived from `result.source_chapter_number` and `source_text`.
    pub fn set(&self, source_text: &str, result: &PrefilterResult) -> bool {
        let key = Self::key_for(result.source_chapter_number, source_text);
        self.repo.set(&key, result, &hash_content(source_text))
    }

    pub fn invalidate(&self, chapter_number: u32, source_text: &str) -> bool {
        self.repo.invalidate(&Self::key_for(chapter_number, source_text))
    }

    pub fn contains(&self, chapter_number: u32, source_text: &str) -> bool {
        self.repo.contains(&Self::key_for(chapter_number, source_text))
    }

    pub fn clear_expired(&self) -> usize {
        self.repo.clear_expired()
    }

    pub fn clear(&self) -> usize {
        self.repo.clear()
    }

    pub fn stats(&self) -> CacheStats {
        self.repo.stats()
    }

    pub fn repository(&self) -> &CacheRepository<PrefilterResult> {
        &self.repo
    }
}
