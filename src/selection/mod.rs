//! The end-to-end "find candidates for this chapter" pipeline.
//!
//! Concepts are extracted from the source chapter, scored against the companion
//! registry to pick books, and the chapters of those books are ranked by
//! similarity. The ranked result is cached for a week. Unless running
//! statistics-only, the result is then rendered into a prompt whose model response
//! is cached for 30 days.
//!
//! The pipeline itself only runs the annotation phase. The selection phase is
//! caller-driven: render [`PromptBuilder::selection_prompt`] and pass it to
//! [`SelectionOrchestrator::invoke_cached`] with [`ModelPhase::Selection`].
//!
//! [`ModelPhase::Selection`]: crate::cache::ModelPhase::Selection

pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{SelectionError, SelectionResult};
pub use orchestrator::{Collaborators, SelectionOrchestrator};
pub use prompt::PromptBuilder;
pub use types::{ModelInvocation, SelectionConfig, SelectionMode, SelectionOutcome, UnknownMode};
