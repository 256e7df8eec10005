use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXCERPT_CHARS, DEFAULT_MAX_FEATURES, DEFAULT_MIN_SIMILARITY, DEFAULT_NGRAM_RANGE,
    DEFAULT_TOP_N,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A companion-book chapter as materialized by a chapter source, before ranking.
pub struct CandidateChapter {
    pub book_name: String,
    pub chapter_number: u32,
    pub chapter_title: String,
    pub text: String,
    /// Keywords of the chapter, if known. Empty means "match against the text".
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
}

impl CandidateChapter {
    pub fn new(
        book_name: impl Into<String>,
        chapter_number: u32,
        chapter_title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            book_name: book_name.into(),
            chapter_number,
            chapter_title: chapter_title.into(),
            text: text.into(),
            keywords: Vec::new(),
            concepts: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.concepts = concepts.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A ranked chapter, as stored inside prefilter results.
pub struct ChapterCandidate {
    pub book_name: String,
    pub chapter_number: u32,
    pub chapter_title: String,
    /// Final score in `[0, 1]` (cosine plus capped overlap boost).
    pub similarity_score: f32,
    pub matched_keywords: Vec<String>,
    pub matched_concepts: Vec<String>,
    pub excerpt: String,
}

#[derive(Debug, Clone, Copy, Default)]
/// Source side of a ranking call.
pub struct RankQuery<'a> {
    pub text: &'a str,
    pub keywords: &'a [String],
    pub concepts: &'a [String],
}

impl<'a> RankQuery<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            keywords: &[],
            concepts: &[],
        }
    }

    pub fn with_keywords(mut self, keywords: &'a [String]) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_concepts(mut self, concepts: &'a [String]) -> Self {
        self.concepts = concepts;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankOutcome {
    /// Surviving candidates, best first.
    pub candidates: Vec<ChapterCandidate>,
    /// Number of candidates scored before filtering and truncation.
    pub total_scored: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerConfig {
    pub top_n: usize,
    pub min_similarity: f32,
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub excerpt_chars: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            min_similarity: DEFAULT_MIN_SIMILARITY,
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: DEFAULT_NGRAM_RANGE,
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}
