use std::sync::Arc;

use super::*;
use crate::cache::{
    CacheStatus, MemoryRecordStore, ModelPhase, ModelResponseCache, StatisticalPrefilterCache,
};
use crate::clock::ManualClock;
use crate::extract::{Extraction, MockConceptExtractor};
use crate::model::MockModelClient;
use crate::similarity::{CandidateChapter, CountingRanker, RankerConfig};
use crate::source::MockChapterSource;
use crate::taxonomy::{CorpusEntry, TaxonomyRegistry, Tier};

const SOURCE: &str = "Coroutines and the Event Loop\n\nAsyncio runs coroutines on an event loop. \
    The event loop schedules tasks and futures until they complete.";

const REPLY: &str = r#"{"annotations": [{"book": "Async Book", "chapter": 1}]}"#;

struct Harness {
    orchestrator: SelectionOrchestrator,
    ranker: Arc<CountingRanker>,
    model: Arc<MockModelClient>,
    source: Arc<MockChapterSource>,
    prefilter_store: Arc<MemoryRecordStore>,
}

fn registry() -> Arc<TaxonomyRegistry> {
    let entries = vec![
        CorpusEntry::new("Async Book", Tier::Implementation, 1.0)
            .with_triggers(["asyncio", "event", "loop", "coroutines", "tasks"])
            .cascades_to(["Concurrency Book"]),
        CorpusEntry::new("Concurrency Book", Tier::ArchitectureSpine, 1.0)
            .with_triggers(["threads", "locks"]),
        CorpusEntry::new("Storage Book", Tier::EngineeringPractices, 1.0)
            .with_triggers(["pages", "btree"]),
    ];
    Arc::new(TaxonomyRegistry::new(entries).unwrap())
}

fn chapter_source() -> MockChapterSource {
    MockChapterSource::new()
        .with_book(
            "Async Book",
            vec![
                CandidateChapter::new(
                    "Async Book",
                    1,
                    "Event Loops",
                    "The event loop schedules tasks; coroutines yield to the event loop.",
                ),
                CandidateChapter::new("Async Book", 2, "Packaging", "Wheels, sdists and versions."),
            ],
        )
        .with_book(
            "Concurrency Book",
            vec![CandidateChapter::new(
                "Concurrency Book",
                1,
                "Threads",
                "Threads and locks versus an event loop running tasks.",
            )],
        )
}

fn extraction() -> Extraction {
    Extraction {
        keywords: vec![
            "asyncio".to_string(),
            "event".to_string(),
            "loop".to_string(),
            "coroutines".to_string(),
        ],
        concepts: vec!["event loop".to_string()],
        summary: "Asyncio runs coroutines on an event loop.".to_string(),
    }
}

fn harness_with(extractor: MockConceptExtractor, model: MockModelClient) -> Harness {
    let ranker = Arc::new(CountingRanker::new(RankerConfig {
        min_similarity: 0.0,
        ..RankerConfig::default()
    }));
    let model = Arc::new(model);
    let source = Arc::new(chapter_source());
    let prefilter_store = Arc::new(MemoryRecordStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000));

    let orchestrator = SelectionOrchestrator::new(
        registry(),
        Collaborators {
            extractor: Arc::new(extractor),
            source: source.clone(),
            ranker: ranker.clone(),
            model: model.clone(),
        },
        StatisticalPrefilterCache::new(prefilter_store.clone(), clock.clone()),
        ModelResponseCache::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryRecordStore::new()),
            clock.clone(),
        ),
        clock,
    );

    Harness {
        orchestrator,
        ranker,
        model,
        source,
        prefilter_store,
    }
}

fn harness() -> Harness {
    harness_with(MockConceptExtractor::new(extraction()), MockModelClient::new(REPLY))
}

#[test]
fn test_mode_parsing() {
    assert_eq!("statistics".parse(), Ok(SelectionMode::StatisticsOnly));
    assert_eq!(" Hybrid ".parse(), Ok(SelectionMode::Hybrid));
    assert_eq!("model".parse(), Ok(SelectionMode::ModelOnly));
    assert!("fast".parse::<SelectionMode>().is_err());
    assert_eq!(SelectionMode::default(), SelectionMode::Hybrid);
}

#[test]
fn test_mode_serializes_as_name() {
    assert_eq!(
        serde_json::to_string(&SelectionMode::StatisticsOnly).unwrap(),
        "\"statistics\""
    );
    assert_eq!(
        serde_json::from_str::<SelectionMode>("\"model\"").unwrap(),
        SelectionMode::ModelOnly
    );
}

#[test]
fn test_statistics_only_ranks_without_model() {
    let h = harness();

    let outcome = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
        .unwrap();

    assert!(outcome.model.is_none());
    assert_eq!(outcome.prefilter_cache, CacheStatus::Miss);
    assert_eq!(h.model.calls(), 0);

    let result = &outcome.prefilter;
    assert_eq!(result.source_chapter_number, 3);
    assert_eq!(result.source_chapter_title, "Coroutines and the Event Loop");
    assert_eq!(result.mode, SelectionMode::StatisticsOnly);
    assert_eq!(result.keywords, extraction().keywords);
    assert_eq!(result.total_candidates_scored, 3);
    assert_eq!(result.candidates[0].book_name, "Async Book");
    assert_eq!(result.candidates[0].chapter_number, 1);
    assert!(
        result
            .candidates
            .iter()
            .all(|c| c.book_name != "Storage Book")
    );
}

#[test]
fn test_second_call_is_served_from_cache() {
    let h = harness();

    let first = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::Hybrid)
        .unwrap();
    let second = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::Hybrid)
        .unwrap();

    assert_eq!(first.prefilter, second.prefilter);
    assert_eq!(h.ranker.calls(), 1);
    assert_eq!(h.model.calls(), 1);
    assert_eq!(second.prefilter_cache, CacheStatus::Hit);
    assert_eq!(second.model.map(|m| m.cache), Some(CacheStatus::Hit));
}

#[test]
fn test_edited_source_is_re_ranked() {
    let h = harness();

    h.orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
        .unwrap();
    let edited = format!("{} Tasks are cancelled cooperatively.", SOURCE);
    let outcome = h
        .orchestrator
        .select_and_enhance(3, &edited, SelectionMode::StatisticsOnly)
        .unwrap();

    assert_eq!(outcome.prefilter_cache, CacheStatus::Miss);
    assert_eq!(h.ranker.calls(), 2);
}

#[test]
fn test_hybrid_caches_annotation_response() {
    let h = harness();

    let outcome = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::Hybrid)
        .unwrap();

    let model = outcome.model.expect("hybrid invokes the model");
    assert_eq!(model.cache, CacheStatus::Miss);
    assert_eq!(model.record.phase, ModelPhase::Annotation);
    assert_eq!(model.record.chapter_number, 3);
    assert_eq!(model.record.response_text, REPLY);
    assert_eq!(model.record.parsed_data["annotations"][0]["book"], "Async Book");
    assert_eq!(model.record.model_id, MockModelClient::MODEL_ID);

    let prompt = &h.model.prompts()[0];
    assert!(prompt.contains("Async Book"));
    assert!(prompt.contains("Source chapter 3"));
    assert!(
        h.orchestrator
            .model_cache()
            .contains(ModelPhase::Annotation, 3, prompt)
    );
}

#[test]
fn test_model_only_bypasses_ranking_and_prefilter_cache() {
    let h = harness();

    let outcome = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::ModelOnly)
        .unwrap();

    assert_eq!(h.ranker.calls(), 0);
    assert_eq!(outcome.prefilter_cache, CacheStatus::Bypassed);
    assert_eq!(outcome.prefilter.mode, SelectionMode::ModelOnly);
    assert_eq!(outcome.prefilter.candidates.len(), 3);
    assert_eq!(outcome.prefilter.total_candidates_scored, 3);
    assert!(
        outcome
            .prefilter
            .candidates
            .iter()
            .all(|c| c.similarity_score == 0.0)
    );
    assert!(h.prefilter_store.is_empty());
    assert_eq!(h.model.calls(), 1);
    // Every registered book was asked for its chapters.
    assert_eq!(h.source.calls(), 3);
}

#[test]
fn test_extraction_failure_propagates() {
    let h = harness_with(MockConceptExtractor::failing(), MockModelClient::new(REPLY));

    let err = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::Hybrid)
        .unwrap_err();

    assert!(matches!(err, SelectionError::Extraction(_)));
    assert_eq!(err.to_string(), "mock extractor failure");
    assert_eq!(h.ranker.calls(), 0);
}

#[test]
fn test_model_failure_propagates_after_prefilter_is_cached() {
    let h = harness_with(
        MockConceptExtractor::new(extraction()),
        MockModelClient::failing(),
    );

    let err = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::Hybrid)
        .unwrap_err();

    assert!(matches!(err, SelectionError::Model(_)));
    assert!(h.orchestrator.prefilter_cache().contains(3, SOURCE));
}

#[test]
fn test_contract_violations() {
    let h = harness();

    assert!(matches!(
        h.orchestrator
            .select_and_enhance(0, SOURCE, SelectionMode::Hybrid),
        Err(SelectionError::InvalidChapterNumber { number: 0 })
    ));
    assert!(matches!(
        h.orchestrator
            .select_and_enhance(1, "  \n", SelectionMode::Hybrid),
        Err(SelectionError::EmptySource { chapter: 1 })
    ));
}

#[test]
fn test_cache_write_failure_does_not_fail_selection() {
    let h = harness();
    h.prefilter_store.set_fail_writes(true);

    for _ in 0..2 {
        h.orchestrator
            .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
            .unwrap();
    }

    assert_eq!(h.ranker.calls(), 2);
}

#[test]
fn test_corrupt_prefilter_record_is_recomputed() {
    let h = harness();
    let key = StatisticalPrefilterCache::key_for(3, SOURCE);
    h.prefilter_store.insert_raw(&key, b"not json at all");

    let outcome = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
        .unwrap();

    assert_eq!(outcome.prefilter_cache, CacheStatus::Corrupt);
    assert_eq!(h.ranker.calls(), 1);
    assert!(h.orchestrator.prefilter_cache().get(3, SOURCE).is_hit());
}

#[test]
fn test_invoke_cached_keeps_phases_apart() {
    let h = harness();

    let selection = h
        .orchestrator
        .invoke_cached(ModelPhase::Selection, 2, "same prompt")
        .unwrap();
    let annotation = h
        .orchestrator
        .invoke_cached(ModelPhase::Annotation, 2, "same prompt")
        .unwrap();
    let again = h
        .orchestrator
        .invoke_cached(ModelPhase::Selection, 2, "same prompt")
        .unwrap();

    assert_eq!(selection.cache, CacheStatus::Miss);
    assert_eq!(annotation.cache, CacheStatus::Miss);
    assert_eq!(again.cache, CacheStatus::Hit);
    assert_eq!(again.record, selection.record);
    assert_eq!(h.model.calls(), 2);
}

#[test]
fn test_selection_config_limits_books() {
    let h = harness();
    let orchestrator = h.orchestrator.with_config(SelectionConfig {
        include_cascades: false,
        ..SelectionConfig::default()
    });

    let outcome = orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
        .unwrap();

    assert!(
        outcome
            .prefilter
            .candidates
            .iter()
            .all(|c| c.book_name == "Async Book")
    );
    assert_eq!(outcome.prefilter.total_candidates_scored, 2);
}

#[test]
fn test_prompts_are_deterministic() {
    let h = harness();
    let outcome = h
        .orchestrator
        .select_and_enhance(3, SOURCE, SelectionMode::StatisticsOnly)
        .unwrap();
    let builder = PromptBuilder::new();

    let annotation = builder.annotation_prompt(&outcome.prefilter);
    let selection = builder.selection_prompt(&outcome.prefilter);

    assert_eq!(annotation, builder.annotation_prompt(&outcome.prefilter));
    assert_ne!(annotation, selection);
    assert!(annotation.contains("Keywords: asyncio, event, loop, coroutines"));
    assert!(annotation.contains("## Candidate 1: Async Book, chapter 1 (Event Loops)"));
    assert!(selection.contains("\"selected\""));
}
