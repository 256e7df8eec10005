//! Keyword, concept and summary extraction for source chapters.

pub mod keyword;
pub mod types;


pub use keyword::KeywordExtractor;
pub use types::{Extraction, ExtractorConfig};

use crate::BoxError;

/// Pulls keywords, concepts and a summary out of chapter text.
///
/// Implementations must be deterministic: the prefilter cache is keyed on the
/// source text alone, so equal input has to produce equal output.
pub trait ConceptExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Extraction, BoxError>;
}

#[cfg(any(test, feature = "mock"))]
/// Returns a fixed extraction and counts calls.
#[derive(Debug, Default)]
pub struct MockConceptExtractor {
    extraction: Extraction,
    fail: bool,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "mock"))]
impl MockConceptExtractor {
    pub fn new(extraction: Extraction) -> Self {
        Self {
            extraction,
            ..Self::default()
        }
    }

    /// An extractor whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl ConceptExtractor for MockConceptExtractor {
    fn extract(&self, _text: &str) -> Result<Extraction, BoxError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self.fail {
            return Err("mock extractor failure".into());
        }
        Ok(self.extraction.clone())
    }
}
