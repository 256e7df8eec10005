//! Graph-level relevance: which companion books matter for a chapter.
//!
//! [`RelevanceScorer::score_entries`] ranks every registry entry by trigger overlap
//! scaled by its weight. [`RelevanceScorer::recommend`] keeps the entries above a
//! threshold, follows their cascade edges and orders the result by tier.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::{RelevanceError, RelevanceResult};
pub use scorer::RelevanceScorer;
pub use types::{ConceptSet, RecommendOptions, Recommendation, ScoredCandidate};
