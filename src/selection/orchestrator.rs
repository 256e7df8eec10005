use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use crate::cache::{
    CacheLookup, CacheStatus, ModelPhase, ModelResponseCache, ModelResponseRecord,
    PrefilterResult, StatisticalPrefilterCache,
};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::constants::DEFAULT_EXCERPT_CHARS;
use crate::extract::{ConceptExtractor, Extraction, KeywordExtractor};
use crate::hashing::hash_content;
use crate::model::{GenaiModelClient, ModelClient, parse_response_json};
use crate::relevance::{ConceptSet, RelevanceScorer};
use crate::similarity::ranker::excerpt;
use crate::similarity::{
    CandidateChapter, CandidateRanker, ChapterCandidate, RankQuery, SimilarityRanker,
};
use crate::source::{ChapterSource, DirectoryChapterSource, chapter_title};
use crate::taxonomy::{TaxonomyRegistry, default_registry};

use super::error::{SelectionError, SelectionResult};
use super::prompt::PromptBuilder;
use super::types::{ModelInvocation, SelectionConfig, SelectionMode, SelectionOutcome};

/// External seams of the pipeline.
#[derive(Clone)]
pub struct Collaborators {
    pub extractor: Arc<dyn ConceptExtractor>,
    pub source: Arc<dyn ChapterSource>,
    pub ranker: Arc<dyn CandidateRanker>,
    pub model: Arc<dyn ModelClient>,
}

/// End-to-end candidate selection for one source chapter at a time.
///
/// Cache-aside over both tiers: ranked candidates come from the prefilter cache
/// when the chapter text is unchanged, model responses from the model cache when
/// the prompt is unchanged.
pub struct SelectionOrchestrator {
    scorer: RelevanceScorer,
    collaborators: Collaborators,
    prefilter_cache: StatisticalPrefilterCache,
    model_cache: ModelResponseCache,
    clock: Arc<dyn Clock>,
    config: SelectionConfig,
    prompts: PromptBuilder,
}

impl std::fmt::Debug for SelectionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionOrchestrator")
            .field("registry_entries", &self.scorer.registry().len())
            .field("prefilter_cache", &self.prefilter_cache)
            .field("model_cache", &self.model_cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SelectionOrchestrator {
    pub fn new(
        registry: Arc<TaxonomyRegistry>,
        collaborators: Collaborators,
        prefilter_cache: StatisticalPrefilterCache,
        model_cache: ModelResponseCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scorer: RelevanceScorer::new(registry),
            collaborators,
            prefilter_cache,
            model_cache,
            clock,
            config: SelectionConfig::default(),
            prompts: PromptBuilder::new(),
        }
    }

    pub fn with_config(mut self, config: SelectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Built-in registry and collaborators, filesystem caches under `config.cache_dir`.
    pub fn from_config(config: &Config) -> SelectionResult<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let collaborators = Collaborators {
            extractor: Arc::new(KeywordExtractor::default()),
            source: Arc::new(DirectoryChapterSource::new(&config.corpus_dir)),
            ranker: Arc::new(SimilarityRanker::new(config.ranker_config())),
            model: Arc::new(GenaiModelClient::new(config.model.clone())?),
        };

        Ok(Self::new(
            Arc::new(default_registry()?),
            collaborators,
            StatisticalPrefilterCache::open(
                &config.cache_dir,
                Arc::clone(&clock),
                config.prefilter_ttl_secs,
            ),
            ModelResponseCache::open(&config.cache_dir, Arc::clone(&clock), config.model_ttl_secs),
            clock,
        )
        .with_config(config.selection_config()))
    }

    pub fn scorer(&self) -> &RelevanceScorer {
        &self.scorer
    }

    pub fn prefilter_cache(&self) -> &StatisticalPrefilterCache {
        &self.prefilter_cache
    }

    pub fn model_cache(&self) -> &ModelResponseCache {
        &self.model_cache
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Finds candidate chapters for a source chapter and, unless `mode` is
    /// statistics-only, asks the model to annotate them.
    ///
    /// Extraction, chapter-source and model failures are returned unchanged; cache
    /// failures only cost recomputation.
    #[instrument(skip(self, source_text), fields(text_len = source_text.len(), mode = %mode))]
    pub fn select_and_enhance(
        &self,
        chapter_number: u32,
        source_text: &str,
        mode: SelectionMode,
    ) -> SelectionResult<SelectionOutcome> {
        if chapter_number == 0 {
            return Err(SelectionError::InvalidChapterNumber {
                number: chapter_number,
            });
        }
        if source_text.trim().is_empty() {
            return Err(SelectionError::EmptySource {
                chapter: chapter_number,
            });
        }

        let started = Instant::now();
        let extraction = self
            .collaborators
            .extractor
            .extract(source_text)
            .map_err(SelectionError::Extraction)?;

        let (prefilter, prefilter_cache) = if mode.uses_ranking() {
            match self.prefilter_cache.get(chapter_number, source_text) {
                CacheLookup::Hit(result) => {
                    debug!("Prefilter cache hit, skipping ranking");
                    (result, CacheStatus::Hit)
                }
                lookup => {
                    let result =
                        self.run_prefilter(chapter_number, source_text, &extraction, mode, started)?;
                    self.prefilter_cache.set(source_text, &result);
                    (result, lookup.status())
                }
            }
        } else {
            let result = self.unranked(chapter_number, source_text, &extraction, started)?;
            (result, CacheStatus::Bypassed)
        };

        let model = if mode.uses_model() {
            let prompt = self.prompts.annotation_prompt(&prefilter);
            Some(self.invoke_cached(ModelPhase::Annotation, chapter_number, &prompt)?)
        } else {
            None
        };

        info!(
            candidates = prefilter.candidates.len(),
            total_scored = prefilter.total_candidates_scored,
            prefilter_cache = %prefilter_cache,
            model_cache = model.as_ref().map(|m| m.cache.as_str()),
            "Selection completed"
        );

        Ok(SelectionOutcome {
            prefilter,
            prefilter_cache,
            model,
        })
    }

    /// Cache-aside model call: a cached response for the same phase, chapter and
    /// prompt is returned without contacting the model.
    ///
    /// This is the only entry point for [`ModelPhase::Selection`].
    #[instrument(skip(self, prompt), fields(phase = %phase, prompt_len = prompt.len()))]
    pub fn invoke_cached(
        &self,
        phase: ModelPhase,
        chapter_number: u32,
        prompt: &str,
    ) -> SelectionResult<ModelInvocation> {
        let lookup = match self.model_cache.get(phase, chapter_number, prompt) {
            CacheLookup::Hit(record) => {
                debug!("Model response cache hit");
                return Ok(ModelInvocation {
                    record,
                    cache: CacheStatus::Hit,
                });
            }
            other => other,
        };

        let reply = self
            .collaborators
            .model
            .invoke(prompt)
            .map_err(SelectionError::Model)?;

        let record = ModelResponseRecord {
            phase,
            chapter_number,
            prompt_hash: hash_content(prompt),
            parsed_data: parse_response_json(&reply.text),
            response_text: reply.text,
            model_id: reply.model_id,
            tokens_used: reply.tokens_used,
        };
        self.model_cache.set(&record);

        info!(
            model = %record.model_id,
            tokens_used = record.tokens_used,
            "Model response cached"
        );

        Ok(ModelInvocation {
            record,
            cache: lookup.status(),
        })
    }

    fn run_prefilter(
        &self,
        chapter_number: u32,
        source_text: &str,
        extraction: &Extraction,
        mode: SelectionMode,
        started: Instant,
    ) -> SelectionResult<PrefilterResult> {
        let concepts =
            ConceptSet::from_phrases(extraction.keywords.iter().chain(&extraction.concepts));
        let books = self
            .scorer
            .recommend(&concepts, &self.config.recommend_options())?;
        debug!(books = ?books, "Recommended companion books");

        let chapters = self.load_chapters(books.iter().map(String::as_str))?;
        let query = RankQuery::new(source_text)
            .with_keywords(&extraction.keywords)
            .with_concepts(&extraction.concepts);
        let outcome = self.collaborators.ranker.rank(&query, &chapters);

        Ok(self.assemble(
            chapter_number,
            source_text,
            extraction,
            outcome.candidates,
            outcome.total_scored,
            mode,
            started,
        ))
    }

    /// Every chapter of every registered book, in registry order, score 0.
    fn unranked(
        &self,
        chapter_number: u32,
        source_text: &str,
        extraction: &Extraction,
        started: Instant,
    ) -> SelectionResult<PrefilterResult> {
        let chapters = self.load_chapters(self.scorer.registry().names())?;
        let candidates: Vec<ChapterCandidate> = chapters
            .into_iter()
            .map(|c| ChapterCandidate {
                excerpt: excerpt(&c.text, DEFAULT_EXCERPT_CHARS),
                book_name: c.book_name,
                chapter_number: c.chapter_number,
                chapter_title: c.chapter_title,
                similarity_score: 0.0,
                matched_keywords: Vec::new(),
                matched_concepts: Vec::new(),
            })
            .collect();
        let total = candidates.len();

        Ok(self.assemble(
            chapter_number,
            source_text,
            extraction,
            candidates,
            total,
            SelectionMode::ModelOnly,
            started,
        ))
    }

    fn load_chapters<'a>(
        &self,
        books: impl Iterator<Item = &'a str>,
    ) -> SelectionResult<Vec<CandidateChapter>> {
        let mut chapters = Vec::new();
        for book in books {
            let loaded = self
                .collaborators
                .source
                .chapters(book)
                .map_err(SelectionError::ChapterSource)?;
            chapters.extend(loaded);
        }
        Ok(chapters)
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        &self,
        chapter_number: u32,
        source_text: &str,
        extraction: &Extraction,
        candidates: Vec<ChapterCandidate>,
        total_candidates_scored: usize,
        mode: SelectionMode,
        started: Instant,
    ) -> PrefilterResult {
        PrefilterResult {
            source_chapter_number: chapter_number,
            source_chapter_title: chapter_title(source_text)
                .unwrap_or_else(|| format!("Chapter {}", chapter_number)),
            keywords: extraction.keywords.clone(),
            concepts: extraction.concepts.clone(),
            summary: extraction.summary.clone(),
            candidates,
            total_candidates_scored,
            timestamp: self.clock.now_epoch_secs(),
            mode,
            processing_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
