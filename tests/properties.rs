//! Property tests for book scoring, cascades and chapter ranking.

use std::sync::Arc;

use proptest::prelude::*;
use xref::relevance::{ConceptSet, RecommendOptions, RelevanceScorer};
use xref::similarity::{CandidateChapter, RankQuery, RankerConfig, SimilarityRanker};
use xref::taxonomy::{CorpusEntry, TaxonomyRegistry, Tier};

const VOCAB: &[&str] = &[
    "asyncio", "event", "loop", "task", "future", "thread", "lock", "queue", "btree",
    "storage", "index", "replication", "pytest", "fixture", "domain", "aggregate",
];

fn book_name(i: usize) -> String {
    format!("Book {}", i)
}

fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(VOCAB).prop_map(str::to_string),
        1 => "[a-z]{2,8}",
    ]
}

fn arb_tier() -> impl Strategy<Value = Tier> {
    prop_oneof![
        Just(Tier::ArchitectureSpine),
        Just(Tier::Implementation),
        Just(Tier::EngineeringPractices),
    ]
}

/// Valid registries: unique names, weights in range, cascades to other existing entries.
fn arb_registry() -> impl Strategy<Value = TaxonomyRegistry> {
    (1usize..8)
        .prop_flat_map(|n| {
            prop::collection::vec(
                (
                    arb_tier(),
                    0.5f32..=1.2f32,
                    prop::collection::vec(arb_word(), 1..8),
                    prop::collection::vec(0..n, 0..=3),
                ),
                n,
            )
        })
        .prop_map(|specs| {
            let entries = specs
                .into_iter()
                .enumerate()
                .map(|(i, (tier, weight, triggers, targets))| {
                    let mut targets: Vec<usize> = targets.into_iter().filter(|&t| t != i).collect();
                    targets.sort_unstable();
                    targets.dedup();
                    CorpusEntry::new(book_name(i), tier, weight)
                        .with_triggers(triggers)
                        .cascades_to(targets.into_iter().map(book_name))
                })
                .collect();
            TaxonomyRegistry::new(entries).expect("generated registry is valid")
        })
}

fn arb_concepts() -> impl Strategy<Value = ConceptSet> {
    prop::collection::vec(arb_word(), 0..12).prop_map(ConceptSet::from_phrases)
}

fn arb_options() -> impl Strategy<Value = RecommendOptions> {
    (0.0f32..=1.0f32, 1usize..10).prop_map(|(min_relevance, max_results)| RecommendOptions {
        min_relevance,
        include_cascades: true,
        max_results,
        cascade_depth: 1,
    })
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(String::new()),
        1 => Just("  \n\t ".to_string()),
        6 => prop::collection::vec(arb_word(), 0..40).prop_map(|w| w.join(" ")),
    ]
}

fn arb_chapters() -> impl Strategy<Value = Vec<CandidateChapter>> {
    prop::collection::vec(
        (arb_text(), prop::collection::vec(arb_word(), 0..4)),
        0..8,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (text, keywords))| {
                let number = i as u32 + 1;
                CandidateChapter::new("Book", number, format!("Chapter {}", number), text)
                    .with_keywords(keywords)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn score_entries_are_sorted_and_within_weight(
        registry in arb_registry(),
        concepts in arb_concepts(),
    ) {
        let scorer = RelevanceScorer::new(Arc::new(registry));
        let scored = scorer.score_entries(&concepts);

        prop_assert_eq!(scored.len(), scorer.registry().len());
        for pair in scored.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for s in &scored {
            prop_assert!(s.score >= 0.0);
            prop_assert!(s.score <= s.entry.relevance_weight + 1e-6);
        }
    }

    #[test]
    fn cascaded_books_come_from_selected_entries_with_edges(
        registry in arb_registry(),
        concepts in arb_concepts(),
        options in arb_options(),
    ) {
        let scorer = RelevanceScorer::new(Arc::new(registry));
        let scored = scorer.score_entries(&concepts);
        let score_of = |name: &str| {
            scored
                .iter()
                .find(|s| s.entry.name == name)
                .map_or(0.0, |s| s.score)
        };

        let recs = scorer.recommend_detailed(&concepts, &options).unwrap();

        prop_assert!(recs.len() <= options.max_results);
        for rec in &recs {
            match &rec.cascaded_from {
                None => prop_assert!(rec.score >= options.min_relevance),
                Some(origin) => {
                    let origin_entry = scorer.registry().get(origin).unwrap();
                    prop_assert!(origin_entry.has_cascades());
                    prop_assert!(origin_entry.cascades_to.contains(&rec.entry.name));
                    prop_assert!(score_of(origin) >= options.min_relevance);
                }
            }
        }
    }

    #[test]
    fn rank_scores_stay_in_unit_interval(
        source in arb_text(),
        keywords in prop::collection::vec(arb_word(), 0..8),
        concepts in prop::collection::vec((arb_word(), arb_word()), 0..4),
        chapters in arb_chapters(),
    ) {
        let ranker = SimilarityRanker::new(RankerConfig {
            min_similarity: 0.0,
            ..RankerConfig::default()
        });
        let concepts: Vec<String> = concepts.into_iter().map(|(a, b)| format!("{} {}", a, b)).collect();
        let query = RankQuery::new(&source)
            .with_keywords(&keywords)
            .with_concepts(&concepts);

        let outcome = ranker.rank(&query, &chapters);

        prop_assert_eq!(outcome.total_scored, chapters.len());
        for pair in outcome.candidates.windows(2) {
            prop_assert!(pair[0].similarity_score >= pair[1].similarity_score);
        }
        for candidate in &outcome.candidates {
            prop_assert!((0.0..=1.0).contains(&candidate.similarity_score));
            let text = &chapters[candidate.chapter_number as usize - 1].text;
            if text.trim().is_empty() {
                prop_assert_eq!(candidate.similarity_score, 0.0);
            }
        }
    }
}
