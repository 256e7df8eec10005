//! Content hashing for cache keys and invalidation.
//!
//! Every hash is BLAKE3 over the exact input bytes, rendered as lowercase hex so it
//! can be embedded in file names and in the persisted `_metadata.contentHash` field.

use crate::constants::SHORT_HASH_LEN;

/// Returns the full 64-char hex digest of `text`.
#[inline]
pub fn hash_content(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Returns the first [`SHORT_HASH_LEN`] hex characters of [`hash_content`].
///
/// Short hashes only disambiguate cache keys. A collision yields a record whose
/// stored content hash differs from the expected one, which the repository treats
/// as an implicit invalidation rather than a false hit.
#[inline]
pub fn short_hash(text: &str) -> String {
    let mut hex = hash_content(text);
    hex.truncate(SHORT_HASH_LEN);
    hex
}

/// `chapter_{n}_{first 8 hex chars of digest}`.
pub fn chapter_key(chapter_number: u32, digest: &str) -> String {
    let short: String = digest.chars().take(SHORT_HASH_LEN).collect();
    format!("chapter_{}_{}", chapter_number, short)
}

/// Key of a statistical prefilter record.
#[inline]
pub fn prefilter_key(chapter_number: u32, source_text: &str) -> String {
    chapter_key(chapter_number, &short_hash(source_text))
}

/// Key of a model response record inside its phase namespace.
#[inline]
pub fn model_response_key(chapter_number: u32, prompt: &str) -> String {
    chapter_key(chapter_number, &short_hash(prompt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hash_content_determinism() {
        let text = "Chapter 3: Dependency Injection";

        let hash1 = hash_content(text);
        let hash2 = hash_content(text);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_content_uniqueness() {
        let texts = [
            "Chapter 3: Dependency Injection",
            "Chapter 3: dependency injection",
            "Chapter 3: Dependency Injection ",
            "Chapter 4: Dependency Injection",
        ];

        let hashes: HashSet<_> = texts.iter().map(|t| hash_content(t)).collect();
        assert_eq!(hashes.len(), texts.len());
    }

    #[test]
    fn test_short_hash_is_prefix() {
        let text = "some chapter text";
        let short = short_hash(text);

        assert_eq!(short.len(), SHORT_HASH_LEN);
        assert!(hash_content(text).starts_with(&short));
    }

    #[test]
    fn test_prefilter_key_format() {
        let key = prefilter_key(7, "text");
        assert_eq!(key, format!("chapter_7_{}", short_hash("text")));
    }

    #[test]
    fn test_prefilter_key_changes_with_content() {
        assert_ne!(prefilter_key(1, "first draft"), prefilter_key(1, "second draft"));
        assert_ne!(prefilter_key(1, "same"), prefilter_key(2, "same"));
    }

    #[test]
    fn test_model_response_key_tracks_prompt() {
        let a = model_response_key(2, "prompt a");
        let b = model_response_key(2, "prompt b");
        assert_ne!(a, b);
        assert!(a.starts_with("chapter_2_"));
    }

    #[test]
    fn test_hash_empty_string() {
        let hash = hash_content("");
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, "0".repeat(64));
    }
}
