use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::taxonomy::TaxonomyRegistry;

use super::error::RelevanceResult;
use super::types::{ConceptSet, RecommendOptions, Recommendation, ScoredCandidate};

/// Scores registry entries against a concept set and expands recommendations
/// along cascade edges.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    registry: Arc<TaxonomyRegistry>,
}

impl RelevanceScorer {
    pub fn new(registry: Arc<TaxonomyRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TaxonomyRegistry {
        &self.registry
    }

    /// Scores every entry, highest first.
    ///
    /// `score = |triggers ∩ concepts| / |triggers| × relevance_weight`. Equal scores
    /// keep registry declaration order, so the output is deterministic.
    pub fn score_entries(&self, concepts: &ConceptSet) -> Vec<ScoredCandidate<'_>> {
        let mut scored: Vec<ScoredCandidate<'_>> = self
            .registry
            .entries()
            .iter()
            .map(|entry| {
                let total = entry.keyword_triggers.len();
                let score = if total == 0 {
                    0.0
                } else {
                    let base = concepts.overlap(&entry.keyword_triggers) as f32 / total as f32;
                    base * entry.relevance_weight
                };
                ScoredCandidate { entry, score }
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored
    }

    /// Returns recommended entry names, best tier first.
    pub fn recommend(
        &self,
        concepts: &ConceptSet,
        options: &RecommendOptions,
    ) -> RelevanceResult<Vec<String>> {
        Ok(self
            .recommend_detailed(concepts, options)?
            .into_iter()
            .map(|r| r.entry.name.clone())
            .collect())
    }

    /// Like [`recommend`](Self::recommend) but keeps scores and cascade origins.
    ///
    /// Cascade targets of a selected entry are added regardless of their own score;
    /// an entry reached more than once appears once, attributed to its first origin.
    pub fn recommend_detailed(
        &self,
        concepts: &ConceptSet,
        options: &RecommendOptions,
    ) -> RelevanceResult<Vec<Recommendation<'_>>> {
        let scored = self.score_entries(concepts);

        let mut seen: HashSet<&str> = HashSet::new();
        let mut results: Vec<Recommendation<'_>> = Vec::new();

        for candidate in scored.iter().filter(|c| c.score >= options.min_relevance) {
            seen.insert(candidate.entry.name.as_str());
            results.push(Recommendation {
                entry: candidate.entry,
                score: candidate.score,
                cascaded_from: None,
            });
        }

        let selected = results.len();

        if options.include_cascades {
            for i in 0..selected {
                let origin = results[i].entry.name.clone();
                for target in self.cascades_of(&origin, options.cascade_depth)? {
                    let entry = self.registry.get(&target)?;
                    if !seen.insert(entry.name.as_str()) {
                        continue;
                    }
                    let score = scored
                        .iter()
                        .find(|c| c.entry.name == entry.name)
                        .map_or(0.0, |c| c.score);
                    results.push(Recommendation {
                        entry,
                        score,
                        cascaded_from: Some(origin.clone()),
                    });
                }
            }
        }

        results.sort_by(|a, b| {
            a.entry
                .tier
                .priority()
                .cmp(&b.entry.tier.priority())
                .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
        });
        results.truncate(options.max_results);

        debug!(
            selected,
            cascaded = results.iter().filter(|r| r.is_cascaded()).count(),
            returned = results.len(),
            "Computed corpus recommendations"
        );

        Ok(results)
    }

    /// Entries reachable from `entry_name` within `depth` hops.
    ///
    /// Breadth-first, duplicates removed, and the origin itself is never returned
    /// even when a cycle leads back to it.
    pub fn cascades_of(&self, entry_name: &str, depth: usize) -> RelevanceResult<Vec<String>> {
        let origin = self.registry.get(entry_name)?;

        let mut seen: HashSet<&str> = HashSet::from([origin.name.as_str()]);
        let mut result = Vec::new();
        let mut frontier = vec![origin];

        for _ in 0..depth {
            let mut next = Vec::new();
            for entry in frontier {
                for target in &entry.cascades_to {
                    let target_entry = self.registry.get(target)?;
                    if seen.insert(target_entry.name.as_str()) {
                        result.push(target_entry.name.clone());
                        next.push(target_entry);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        Ok(result)
    }
}
