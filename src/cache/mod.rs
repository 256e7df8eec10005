//! Two-tier persistent cache.
//!
//! Tier 1 ([`StatisticalPrefilterCache`]) holds ranked candidates per source chapter
//! for a week. Tier 2 ([`ModelResponseCache`]) holds model responses per phase,
//! chapter and prompt for 30 days. Both are thin wrappers over a
//! [`CacheRepository`], which validates TTL and content hash on every read.

pub mod error;
pub mod model;
pub mod prefilter;
pub mod repository;
pub mod store;
pub mod types;


pub use error::{StoreError, StoreResult};
pub use model::{ModelPhase, ModelResponseCache, ModelResponseRecord, UnknownPhase};
pub use prefilter::{PrefilterResult, StatisticalPrefilterCache};
pub use repository::CacheRepository;
#[cfg(any(test, feature = "mock"))]
pub use store::MemoryRecordStore;
pub use store::{FsRecordStore, RecordStore};
pub use types::{CacheEntryMeta, CacheLookup, CacheRecord, CacheStats, CacheStatus, MissReason};
