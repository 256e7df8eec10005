use thiserror::Error;

use crate::taxonomy::RegistryError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RelevanceError {
    /// A concept was empty or not a single word.
    #[error("malformed concept '{concept}': {reason}")]
    MalformedConcept { concept: String, reason: &'static str },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type RelevanceResult<T> = Result<T, RelevanceError>;
