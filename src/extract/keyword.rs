use std::collections::HashMap;

use crate::BoxError;
use crate::similarity::tokenize::content_words;

use super::ConceptExtractor;
use super::types::{Extraction, ExtractorConfig};

/// Frequency-based extractor sharing the ranker's tokenizer and stop words.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    config: ExtractorConfig,
}

impl KeywordExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract_text(&self, text: &str) -> Extraction {
        let tokens = content_words(text);

        let keywords = top_terms(tokens.iter().cloned(), 1, self.config.max_keywords);
        let bigrams = tokens.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));
        let concepts = top_terms(
            bigrams,
            self.config.min_concept_occurrences,
            self.config.max_concepts,
        );

        Extraction {
            keywords,
            concepts,
            summary: leading_sentences(text, self.config.summary_sentences),
        }
    }
}

impl ConceptExtractor for KeywordExtractor {
    fn extract(&self, text: &str) -> Result<Extraction, BoxError> {
        Ok(self.extract_text(text))
    }
}

/// Terms seen at least `min_count` times, by count descending then alphabetically.
fn top_terms(terms: impl Iterator<Item = String>, min_count: usize, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for term in terms {
        *counts.entry(term).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(term, _)| term).collect()
}

fn leading_sentences(text: &str, count: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = normalized.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if sentences.len() == count {
            break;
        }
        let at_boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = idx + c.len_utf8();
            let sentence = normalized[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    if sentences.len() < count {
        let rest = normalized[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
    }

    sentences.join(" ")
}
