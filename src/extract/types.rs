use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// What the extractor found in one chapter.
pub struct Extraction {
    /// Single-word keywords, most frequent first.
    pub keywords: Vec<String>,
    /// Multi-word phrases.
    pub concepts: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub max_keywords: usize,
    pub max_concepts: usize,
    /// A bigram must occur at least this often to become a concept.
    pub min_concept_occurrences: usize,
    pub summary_sentences: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_keywords: 15,
            max_concepts: 10,
            min_concept_occurrences: 2,
            summary_sentences: 2,
        }
    }
}
