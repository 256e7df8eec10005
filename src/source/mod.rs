//! Chapter lookup for companion books.

pub mod directory;
pub mod error;


pub use directory::{DirectoryChapterSource, chapter_title};
pub use error::{SourceError, SourceResult};

use crate::BoxError;
use crate::similarity::CandidateChapter;

/// Materializes the chapters of a companion book by name.
pub trait ChapterSource: Send + Sync {
    fn chapters(&self, book_name: &str) -> Result<Vec<CandidateChapter>, BoxError>;
}

#[cfg(any(test, feature = "mock"))]
/// In-memory chapters keyed by book name. Unknown books have no chapters.
#[derive(Debug, Default)]
pub struct MockChapterSource {
    books: std::collections::HashMap<String, Vec<CandidateChapter>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "mock"))]
impl MockChapterSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, book_name: &str, chapters: Vec<CandidateChapter>) -> Self {
        self.books.insert(book_name.to_string(), chapters);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "mock"))]
impl ChapterSource for MockChapterSource {
    fn chapters(&self, book_name: &str) -> Result<Vec<CandidateChapter>, BoxError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(self.books.get(book_name).cloned().unwrap_or_default())
    }
}
