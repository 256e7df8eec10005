use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::BoxError;
use crate::similarity::CandidateChapter;

use super::ChapterSource;
use super::error::{SourceError, SourceResult};

const CHAPTER_EXTENSIONS: &[&str] = &["txt", "md"];

/// Reads chapters from `<root>/<book name>/*.{txt,md}`.
///
/// Files are ordered by name; the chapter number is the 1-based position and the
/// title is the first non-empty line (leading `#` stripped). A book without a
/// directory has no chapters.
#[derive(Debug, Clone)]
pub struct DirectoryChapterSource {
    root: PathBuf,
}

impl DirectoryChapterSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_book(&self, book_name: &str) -> SourceResult<Vec<CandidateChapter>> {
        let dir = self.book_dir(book_name)?;
        if !dir.is_dir() {
            debug!(book = book_name, path = %dir.display(), "No directory for book");
            return Ok(Vec::new());
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_err(&dir))? {
            let path = entry.map_err(io_err(&dir))?.path();
            let is_chapter = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| CHAPTER_EXTENSIONS.contains(&e));
            if path.is_file() && is_chapter {
                files.push(path);
            }
        }
        files.sort();

        let mut chapters = Vec::with_capacity(files.len());
        for (idx, path) in files.iter().enumerate() {
            let text = fs::read_to_string(path).map_err(io_err(path))?;
            let number = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            let title = chapter_title(&text).unwrap_or_else(|| format!("Chapter {}", number));
            chapters.push(CandidateChapter::new(book_name, number, title, text));
        }

        debug!(book = book_name, chapters = chapters.len(), "Loaded book chapters");
        Ok(chapters)
    }

    fn book_dir(&self, book_name: &str) -> SourceResult<PathBuf> {
        let trimmed = book_name.trim();
        let invalid = trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed.contains(['/', '\\']);
        if invalid {
            return Err(SourceError::InvalidBookName {
                name: book_name.to_string(),
            });
        }
        Ok(self.root.join(trimmed))
    }
}

impl ChapterSource for DirectoryChapterSource {
    fn chapters(&self, book_name: &str) -> Result<Vec<CandidateChapter>, BoxError> {
        Ok(self.load_book(book_name)?)
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> SourceError + use<> {
    let path = path.to_path_buf();
    move |source| SourceError::Io { path, source }
}

/// First non-empty line, Markdown heading marks stripped.
pub fn chapter_title(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
