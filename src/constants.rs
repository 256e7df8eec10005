//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift
//! (e.g. the TTLs are expressed in days and converted once here).

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Statistical prefilter results are cheap to recompute.
pub const PREFILTER_TTL_DAYS: u64 = 7;
pub const PREFILTER_TTL_SECS: u64 = PREFILTER_TTL_DAYS * SECONDS_PER_DAY;

/// Model responses cost a paid round-trip per miss.
pub const MODEL_RESPONSE_TTL_DAYS: u64 = 30;
pub const MODEL_RESPONSE_TTL_SECS: u64 = MODEL_RESPONSE_TTL_DAYS * SECONDS_PER_DAY;

/// Number of hex characters of the BLAKE3 digest used inside cache keys.
pub const SHORT_HASH_LEN: usize = 8;

pub const PREFILTER_NAMESPACE: &str = "prefilter";
pub const MODEL_RESPONSE_NAMESPACE: &str = "model_responses";

pub const DEFAULT_TOP_N: usize = 15;
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.1;
pub const DEFAULT_MAX_FEATURES: usize = 1000;
pub const DEFAULT_NGRAM_RANGE: (usize, usize) = (1, 3);
pub const DEFAULT_EXCERPT_CHARS: usize = 500;

pub const KEYWORD_MATCH_BOOST: f32 = 0.10;
pub const CONCEPT_MATCH_BOOST: f32 = 0.15;
pub const MAX_OVERLAP_BOOST: f32 = 0.5;

pub const DEFAULT_MIN_RELEVANCE: f32 = 0.1;
pub const DEFAULT_MAX_BOOKS: usize = 6;
pub const DEFAULT_CASCADE_DEPTH: usize = 1;

pub const MIN_RELEVANCE_WEIGHT: f32 = 0.5;
pub const MAX_RELEVANCE_WEIGHT: f32 = 1.2;
pub const MAX_CASCADE_EDGES: usize = 3;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Common English words suppressed before n-gram construction.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];
