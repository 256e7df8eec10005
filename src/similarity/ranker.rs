use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::constants::{CONCEPT_MATCH_BOOST, KEYWORD_MATCH_BOOST, MAX_OVERLAP_BOOST};

use super::tokenize::words;
use super::types::{CandidateChapter, ChapterCandidate, RankOutcome, RankQuery, RankerConfig};
use super::vectorizer::{TfidfVectorizer, cosine_similarity};

/// Ranks candidate chapters against a source chapter.
///
/// Implemented by [`SimilarityRanker`]; the orchestrator depends on the trait so
/// alternative rankers (and call-counting test doubles) can be swapped in.
pub trait CandidateRanker: Send + Sync {
    fn rank(&self, query: &RankQuery<'_>, candidates: &[CandidateChapter]) -> RankOutcome;
}

/// TF-IDF cosine ranker with a capped keyword/concept overlap boost.
#[derive(Debug, Clone, Default)]
pub struct SimilarityRanker {
    config: RankerConfig,
}

/// `min(0.5, keywords × 0.10 + concepts × 0.15)`.
pub fn overlap_boost(matched_keywords: usize, matched_concepts: usize) -> f32 {
    let raw = matched_keywords as f32 * KEYWORD_MATCH_BOOST
        + matched_concepts as f32 * CONCEPT_MATCH_BOOST;
    raw.min(MAX_OVERLAP_BOOST)
}

impl SimilarityRanker {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Scores every candidate, then filters to `min_similarity` and keeps `top_n`.
    ///
    /// The vector space is rebuilt from `[source] + candidates` on each call.
    pub fn rank(&self, query: &RankQuery<'_>, candidates: &[CandidateChapter]) -> RankOutcome {
        if candidates.is_empty() {
            return RankOutcome::default();
        }

        let mut documents: Vec<&str> = Vec::with_capacity(candidates.len() + 1);
        documents.push(query.text);
        documents.extend(candidates.iter().map(|c| c.text.as_str()));

        let vectorizer = TfidfVectorizer::new(self.config.max_features, self.config.ngram_range);
        let space = vectorizer.fit_transform(&documents);
        let Some((source_row, candidate_rows)) = space.rows().split_first() else {
            return RankOutcome::default();
        };

        let mut scored: Vec<ChapterCandidate> = candidates
            .iter()
            .zip(candidate_rows)
            .map(|(candidate, row)| {
                let cosine = cosine_similarity(source_row, row) as f32;
                // A chapter with no usable terms scores 0; its metadata alone earns no boost.
                let (matched_keywords, matched_concepts) = if row.is_zero() {
                    (Vec::new(), Vec::new())
                } else {
                    (
                        matched_terms(query.keywords, &candidate.keywords, &candidate.text),
                        matched_terms(query.concepts, &candidate.concepts, &candidate.text),
                    )
                };
                let boost = overlap_boost(matched_keywords.len(), matched_concepts.len());

                ChapterCandidate {
                    book_name: candidate.book_name.clone(),
                    chapter_number: candidate.chapter_number,
                    chapter_title: candidate.chapter_title.clone(),
                    similarity_score: (cosine + boost).clamp(0.0, 1.0),
                    matched_keywords,
                    matched_concepts,
                    excerpt: excerpt(&candidate.text, self.config.excerpt_chars),
                }
            })
            .collect();

        let total_scored = scored.len();

        scored.retain(|c| c.similarity_score >= self.config.min_similarity);
        scored.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(self.config.top_n);

        debug!(
            total_scored,
            kept = scored.len(),
            vocabulary = space.vocabulary_size(),
            top_score = scored.first().map(|c| c.similarity_score),
            "Ranked candidate chapters"
        );

        RankOutcome {
            candidates: scored,
            total_scored,
        }
    }
}

impl CandidateRanker for SimilarityRanker {
    fn rank(&self, query: &RankQuery<'_>, candidates: &[CandidateChapter]) -> RankOutcome {
        SimilarityRanker::rank(self, query, candidates)
    }
}

#[cfg(any(test, feature = "mock"))]
/// [`SimilarityRanker`] that counts how often it ranks.
#[derive(Debug, Default)]
pub struct CountingRanker {
    inner: SimilarityRanker,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "mock"))]
impl CountingRanker {
    pub fn new(config: RankerConfig) -> Self {
        Self {
            inner: SimilarityRanker::new(config),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl CandidateRanker for CountingRanker {
    fn rank(&self, query: &RankQuery<'_>, candidates: &[CandidateChapter]) -> RankOutcome {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.rank(query, candidates)
    }
}

/// Source terms found in the candidate's metadata list, or in its text when the
/// candidate carries no metadata. Case-insensitive, source spelling and order kept.
fn matched_terms(source: &[String], candidate_terms: &[String], candidate_text: &str) -> Vec<String> {
    if source.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    if candidate_terms.is_empty() {
        let text_words: HashSet<String> = words(candidate_text).into_iter().collect();
        for term in source {
            let term_words = words(term);
            let key = term.to_lowercase();
            if !term_words.is_empty()
                && term_words.iter().all(|w| text_words.contains(w))
                && seen.insert(key)
            {
                matched.push(term.clone());
            }
        }
    } else {
        let lookup: HashSet<String> = candidate_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        for term in source {
            let key = term.trim().to_lowercase();
            if lookup.contains(&key) && seen.insert(key) {
                matched.push(term.clone());
            }
        }
    }

    matched
}

/// Leading `max_chars` characters of the trimmed text.
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => trimmed[..byte_idx].trim_end().to_string(),
        None => trimmed.to_string(),
    }
}
