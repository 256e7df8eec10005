//! TF-IDF vector space built per ranking call.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::tokenize::{content_words, ngrams};

#[derive(Debug, Clone, Default, PartialEq)]
/// Sparse vector sorted by term index.
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(i, _)| *i);
        Self { entries }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Scales to unit length. Zero vectors stay zero.
    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// Cosine similarity in `[0, 1]` for non-negative vectors; `0` if either is zero.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfidfVectorizer {
    max_features: usize,
    ngram_range: (usize, usize),
}

#[derive(Debug, Clone)]
/// Fitted vocabulary plus one L2-normalized row per input document.
pub struct TfidfSpace {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl TfidfSpace {
    #[inline]
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    #[inline]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, ngram_range: (usize, usize)) -> Self {
        let min = ngram_range.0.max(1);
        Self {
            max_features,
            ngram_range: (min, ngram_range.1.max(min)),
        }
    }

    /// Fits a vocabulary over `documents` and returns their TF-IDF rows.
    ///
    /// The vocabulary keeps the `max_features` terms with the highest corpus
    /// frequency (ties alphabetical). IDF is smoothed: `ln((1 + n) / (1 + df)) + 1`.
    /// Documents with no in-vocabulary terms get a zero row.
    pub fn fit_transform(&self, documents: &[&str]) -> TfidfSpace {
        let (min_n, max_n) = self.ngram_range;

        let counts: Vec<HashMap<String, u32>> = documents
            .iter()
            .map(|doc| {
                let tokens = content_words(doc);
                let mut tf: HashMap<String, u32> = HashMap::new();
                for term in ngrams(&tokens, min_n, max_n) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        let mut corpus_freq: HashMap<&str, u64> = HashMap::new();
        for tf in &counts {
            for (term, count) in tf {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                *corpus_freq.entry(term.as_str()).or_insert(0) += u64::from(*count);
            }
        }

        let mut terms: Vec<(&str, u64)> = corpus_freq.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms.truncate(self.max_features);

        let n_docs = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (i, (term, _)) in terms.iter().enumerate() {
            let df = f64::from(doc_freq.get(term).copied().unwrap_or(0));
            vocabulary.insert((*term).to_string(), i);
            idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
        }

        let rows = counts
            .iter()
            .map(|tf| {
                let entries = tf
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term)
                            .map(|&i| (i, f64::from(*count) * idf[i]))
                    })
                    .collect();
                let mut row = SparseVector::from_unsorted(entries);
                row.normalize();
                row
            })
            .collect();

        TfidfSpace {
            vocabulary,
            idf,
            rows,
        }
    }
}
