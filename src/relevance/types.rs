use std::collections::BTreeSet;

use crate::constants::{DEFAULT_CASCADE_DEPTH, DEFAULT_MAX_BOOKS, DEFAULT_MIN_RELEVANCE};
use crate::taxonomy::CorpusEntry;

use super::error::{RelevanceError, RelevanceResult};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Lower-cased single words extracted from a chapter.
pub struct ConceptSet {
    words: BTreeSet<String>,
}

impl ConceptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from words that must already be single tokens.
    ///
    /// Fails on empty input words and on words containing whitespace.
    pub fn try_from_words<I, S>(words: I) -> RelevanceResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let raw = word.as_ref();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(RelevanceError::MalformedConcept {
                    concept: raw.to_string(),
                    reason: "empty concept",
                });
            }
            if trimmed.chars().any(char::is_whitespace) {
                return Err(RelevanceError::MalformedConcept {
                    concept: raw.to_string(),
                    reason: "concepts must be single words",
                });
            }
            set.insert(trimmed.to_lowercase());
        }
        Ok(Self { words: set })
    }

    /// Splits free-form phrases (keywords, multi-word concepts) into words.
    pub fn from_phrases<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = phrases
            .into_iter()
            .flat_map(|p| {
                p.as_ref()
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .map(str::to_lowercase)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { words }
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of `triggers` present in this set.
    pub fn overlap(&self, triggers: &BTreeSet<String>) -> usize {
        // Iterate the smaller side.
        if triggers.len() <= self.words.len() {
            triggers.iter().filter(|t| self.words.contains(*t)).count()
        } else {
            self.words.iter().filter(|w| triggers.contains(*w)).count()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A corpus entry with its relevance score for one concept set.
pub struct ScoredCandidate<'r> {
    pub entry: &'r CorpusEntry,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
/// A recommended entry and how it was reached.
pub struct Recommendation<'r> {
    pub entry: &'r CorpusEntry,
    /// The entry's own score, even when it was reached through a cascade.
    pub score: f32,
    /// Name of the selected entry whose cascade edge added this one.
    pub cascaded_from: Option<String>,
}

impl Recommendation<'_> {
    #[inline]
    pub fn is_cascaded(&self) -> bool {
        self.cascaded_from.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendOptions {
    pub min_relevance: f32,
    pub include_cascades: bool,
    pub max_results: usize,
    /// Hops followed from each selected entry. Only `1` is used by the pipeline.
    pub cascade_depth: usize,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            min_relevance: DEFAULT_MIN_RELEVANCE,
            include_cascades: true,
            max_results: DEFAULT_MAX_BOOKS,
            cascade_depth: DEFAULT_CASCADE_DEPTH,
        }
    }
}
