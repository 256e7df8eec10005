//! Companion-corpus registry: entries, tiers and cascade edges.

pub mod defaults;
pub mod error;
pub mod registry;
pub mod types;


pub use defaults::default_registry;
pub use error::{RegistryError, RegistryResult};
pub use registry::TaxonomyRegistry;
pub use types::{CorpusEntry, Tier};
