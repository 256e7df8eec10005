use thiserror::Error;

use crate::BoxError;
use crate::model::ModelError;
use crate::relevance::RelevanceError;
use crate::taxonomy::RegistryError;

#[derive(Error, Debug)]
/// Errors returned by the selection pipeline.
///
/// Cache faults never appear here. Collaborator faults are passed through unchanged.
pub enum SelectionError {
    /// Chapters are numbered from 1.
    #[error("invalid chapter number: {number}")]
    InvalidChapterNumber { number: u32 },

    #[error("source text of chapter {chapter} is empty")]
    EmptySource { chapter: u32 },

    #[error(transparent)]
    Relevance(#[from] RelevanceError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The concept extractor failed.
    #[error(transparent)]
    Extraction(BoxError),

    /// The chapter source failed.
    #[error(transparent)]
    ChapterSource(BoxError),

    /// The model client failed.
    #[error(transparent)]
    Model(BoxError),

    #[error(transparent)]
    ModelSetup(#[from] ModelError),
}

pub type SelectionResult<T> = Result<T, SelectionError>;
