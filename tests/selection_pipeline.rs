//! End-to-end selection over a directory corpus and filesystem caches.

mod common;

use common::fixtures::{ASYNC_BOOK, CorpusDir, MODEL_REPLY, SOURCE_CHAPTER, pipeline};
use tempfile::TempDir;
use xref::cache::{CacheStatus, ModelPhase};
use xref::model::MockModelClient;
use xref::selection::SelectionMode;

#[test]
fn test_statistics_only_selects_the_asyncio_book() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();
    let p = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));

    let outcome = p
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::StatisticsOnly)
        .unwrap();

    let result = &outcome.prefilter;
    assert_eq!(result.source_chapter_title, "Cooperative Concurrency");
    assert_eq!(result.total_candidates_scored, 2);
    assert_eq!(result.candidates.len(), 2);
    assert!(result.candidates.iter().all(|c| c.book_name == ASYNC_BOOK));
    assert!(
        result
            .candidates
            .iter()
            .all(|c| (0.1..=1.0).contains(&c.similarity_score))
    );
    assert!(result.keywords.contains(&"coroutine".to_string()));
    assert!(result.concepts.contains(&"event loop".to_string()));
    assert_eq!(p.model.calls(), 0);
}

#[test]
fn test_rerun_from_a_new_process_hits_both_caches() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();

    let first = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));
    let initial = first
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::Hybrid)
        .unwrap();

    let second = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));
    let rerun = second
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::Hybrid)
        .unwrap();

    assert_eq!(initial.prefilter, rerun.prefilter);
    assert_eq!(rerun.prefilter_cache, CacheStatus::Hit);
    assert_eq!(second.ranker.calls(), 0);
    assert_eq!(second.model.calls(), 0);

    let model = rerun.model.expect("hybrid returns a model response");
    assert_eq!(model.cache, CacheStatus::Hit);
    assert_eq!(model.record.phase, ModelPhase::Annotation);
    assert_eq!(model.record.parsed_data["annotations"][0]["chapter"], 1);
}

#[test]
fn test_expired_prefilter_is_recomputed() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();
    let p = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));

    p.orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::StatisticsOnly)
        .unwrap();
    p.clock.advance(7 * 86_400 + 1);
    let outcome = p
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::StatisticsOnly)
        .unwrap();

    assert_eq!(outcome.prefilter_cache, CacheStatus::Miss);
    assert_eq!(p.ranker.calls(), 2);
}

#[test]
fn test_model_only_sends_every_chapter() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();
    let p = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));

    let outcome = p
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::ModelOnly)
        .unwrap();

    assert_eq!(outcome.prefilter_cache, CacheStatus::Bypassed);
    assert_eq!(outcome.prefilter.candidates.len(), 3);
    assert!(
        outcome
            .prefilter
            .candidates
            .iter()
            .any(|c| c.book_name == "Fluent Python")
    );
    assert_eq!(p.ranker.calls(), 0);
    assert!(!cache.path().join("prefilter").exists());
    assert!(p.model.prompts()[0].contains("The Python Data Model"));
}

#[test]
fn test_model_failure_is_not_masked() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();
    let p = pipeline(cache.path(), corpus.path(), MockModelClient::failing());

    let result = p
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::Hybrid);

    assert!(result.is_err());
    assert_eq!(p.orchestrator.model_cache().stats().entries, 0);
    assert_eq!(p.orchestrator.prefilter_cache().stats().entries, 1);
}

#[test]
fn test_caller_driven_selection_phase_is_cached_separately() {
    let cache = TempDir::new().unwrap();
    let corpus = CorpusDir::standard();
    let p = pipeline(cache.path(), corpus.path(), MockModelClient::new(MODEL_REPLY));

    let outcome = p
        .orchestrator
        .select_and_enhance(5, SOURCE_CHAPTER, SelectionMode::Hybrid)
        .unwrap();
    let prompt = p.orchestrator.prompts().selection_prompt(&outcome.prefilter);

    let first = p
        .orchestrator
        .invoke_cached(ModelPhase::Selection, 5, &prompt)
        .unwrap();
    let second = p
        .orchestrator
        .invoke_cached(ModelPhase::Selection, 5, &prompt)
        .unwrap();

    assert_eq!(first.cache, CacheStatus::Miss);
    assert_eq!(second.cache, CacheStatus::Hit);
    assert_eq!(p.model.calls(), 2);
    assert_eq!(
        p.orchestrator
            .model_cache()
            .phase_stats(ModelPhase::Selection)
            .entries,
        1
    );
    assert_eq!(
        p.orchestrator
            .model_cache()
            .phase_stats(ModelPhase::Annotation)
            .entries,
        1
    );
}
