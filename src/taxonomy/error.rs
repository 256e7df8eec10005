use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
/// Errors raised while building or querying a [`TaxonomyRegistry`](super::TaxonomyRegistry).
pub enum RegistryError {
    /// Two entries share a name.
    #[error("duplicate corpus entry: {name}")]
    DuplicateEntry { name: String },

    /// A cascade edge points at a name not present in the registry.
    #[error("corpus entry '{from}' cascades to unknown entry '{to}'")]
    DanglingCascade { from: String, to: String },

    /// An entry lists itself as a cascade target.
    #[error("corpus entry '{name}' cascades to itself")]
    SelfCascade { name: String },

    /// An entry declares more cascade edges than allowed.
    #[error("corpus entry '{name}' declares {count} cascade edges (max {max})")]
    TooManyCascades {
        name: String,
        count: usize,
        max: usize,
    },

    /// Relevance weight outside the accepted band.
    #[error("corpus entry '{name}' has relevance weight {weight} outside [{min}, {max}]")]
    WeightOutOfRange {
        name: String,
        weight: f32,
        min: f32,
        max: f32,
    },

    /// An entry has no keyword triggers, so it could never score.
    #[error("corpus entry '{name}' has no keyword triggers")]
    EmptyTriggers { name: String },

    /// Lookup of a name that is not registered.
    #[error("corpus entry not found: {name}")]
    NotFound { name: String },
}

pub type RegistryResult<T> = Result<T, RegistryError>;
