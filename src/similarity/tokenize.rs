//! Tokenization shared by the vectorizer and the keyword extractor.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::constants::STOP_WORDS;

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

#[inline]
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

/// Lower-cased word tokens of at least two characters, in text order.
///
/// A word is a run of alphanumeric characters or underscores.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// [`words`] with stop words removed.
pub fn content_words(text: &str) -> Vec<String> {
    words(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Space-joined n-grams of `tokens` for every `n` in `min..=max`.
pub fn ngrams(tokens: &[String], min: usize, max: usize) -> Vec<String> {
    let min = min.max(1);
    let mut out = Vec::new();
    for n in min..=max {
        if n > tokens.len() {
            break;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}
