//! Test fixtures for integration tests.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use xref::cache::{ModelResponseCache, PrefilterResult, StatisticalPrefilterCache};
use xref::clock::ManualClock;
use xref::extract::KeywordExtractor;
use xref::model::MockModelClient;
use xref::selection::{Collaborators, SelectionMode, SelectionOrchestrator};
use xref::similarity::{ChapterCandidate, CountingRanker, RankerConfig};
use xref::source::DirectoryChapterSource;
use xref::taxonomy::default_registry;

pub const FIXED_TIMESTAMP: i64 = 1702512000;

pub const ASYNC_BOOK: &str = "Python Concurrency with asyncio";

pub const SOURCE_CHAPTER: &str = "\
Cooperative Concurrency

Every coroutine runs on the event loop. The event loop picks a task, runs the coroutine
until it hits await, then moves on to the next task. A future holds a result that is not
ready yet; awaiting a future suspends the coroutine. Use gather to await many tasks, and
a timeout to stop waiting. The event loop never blocks while a task awaits a future.";

pub const MODEL_REPLY: &str = "```json\n{\"annotations\": [{\"book\": \"Python Concurrency with asyncio\", \"chapter\": 1}]}\n```";

/// A corpus directory laid out as `<root>/<book>/<file>`.
pub struct CorpusDir {
    dir: TempDir,
}

impl CorpusDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create corpus dir"),
        }
    }

    /// Two chapters of the asyncio book and one Fluent Python chapter.
    pub fn standard() -> Self {
        Self::new()
            .chapter(
                ASYNC_BOOK,
                "01-first-steps.md",
                "# First Steps with asyncio\n\nA coroutine is scheduled as a task on the event \
                 loop. Awaiting a future yields control back to the event loop.",
            )
            .chapter(
                ASYNC_BOOK,
                "02-web-requests.md",
                "# Concurrent Web Requests\n\nUse gather with a timeout to run many requests \
                 as tasks; each task awaits a future from the socket.",
            )
            .chapter(
                "Fluent Python",
                "01-data-model.md",
                "# The Python Data Model\n\nSpecial methods let objects support len and iteration.",
            )
    }

    pub fn chapter(self, book: &str, file: &str, text: &str) -> Self {
        let book_dir = self.dir.path().join(book);
        fs::create_dir_all(&book_dir).expect("create book dir");
        fs::write(book_dir.join(file), text).expect("write chapter");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Collaborators the tests inspect after running the pipeline.
pub struct Pipeline {
    pub orchestrator: SelectionOrchestrator,
    pub ranker: Arc<CountingRanker>,
    pub model: Arc<MockModelClient>,
    pub clock: Arc<ManualClock>,
}

/// Default registry, keyword extraction and directory chapters, with filesystem
/// caches under `cache_dir` and a mock model.
pub fn pipeline(cache_dir: &Path, corpus_dir: &Path, model: MockModelClient) -> Pipeline {
    let clock = Arc::new(ManualClock::new(FIXED_TIMESTAMP));
    let ranker = Arc::new(CountingRanker::new(RankerConfig::default()));
    let model = Arc::new(model);

    let orchestrator = SelectionOrchestrator::new(
        Arc::new(default_registry().expect("default registry is valid")),
        Collaborators {
            extractor: Arc::new(KeywordExtractor::default()),
            source: Arc::new(DirectoryChapterSource::new(corpus_dir)),
            ranker: ranker.clone(),
            model: model.clone(),
        },
        StatisticalPrefilterCache::open(cache_dir, clock.clone(), 7 * 86_400),
        ModelResponseCache::open(cache_dir, clock.clone(), 30 * 86_400),
        clock.clone(),
    );

    Pipeline {
        orchestrator,
        ranker,
        model,
        clock,
    }
}

#[derive(Default)]
pub struct PrefilterResultBuilder {
    chapter: Option<u32>,
    candidates: Vec<ChapterCandidate>,
    mode: Option<SelectionMode>,
}

impl PrefilterResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chapter(mut self, number: u32) -> Self {
        self.chapter = Some(number);
        self
    }

    pub fn candidate(mut self, book: &str, chapter: u32, score: f32) -> Self {
        self.candidates.push(ChapterCandidate {
            book_name: book.to_string(),
            chapter_number: chapter,
            chapter_title: format!("Chapter {}", chapter),
            similarity_score: score,
            matched_keywords: vec!["asyncio".to_string()],
            matched_concepts: vec!["event loop".to_string()],
            excerpt: "An excerpt.".to_string(),
        });
        self
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> PrefilterResult {
        let total = self.candidates.len();
        PrefilterResult {
            source_chapter_number: self.chapter.unwrap_or(1),
            source_chapter_title: "Cooperative Concurrency".to_string(),
            keywords: vec!["event".to_string(), "loop".to_string()],
            concepts: vec!["event loop".to_string()],
            summary: "Every coroutine runs on the event loop.".to_string(),
            candidates: self.candidates,
            total_candidates_scored: total,
            timestamp: FIXED_TIMESTAMP,
            mode: self.mode.unwrap_or_default(),
            processing_time_ms: 12,
        }
    }
}
