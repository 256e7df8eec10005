use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::clock::Clock;

use super::store::RecordStore;
use super::types::{CacheEntryMeta, CacheLookup, CacheRecord, CacheStats, MissReason};

/// TTL + content-hash validated cache over a [`RecordStore`] namespace.
///
/// Reads self-heal: expired, content-changed and undeserializable records are
/// removed when encountered. Storage failures are logged and reported as misses
/// (reads) or `false` (writes); they never propagate.
pub struct CacheRepository<T> {
    namespace: String,
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
    ttl_seconds: u64,
    _payload: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for CacheRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRepository")
            .field("namespace", &self.namespace)
            .field("store", &self.store)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

enum Inspection<T> {
    Valid(CacheRecord<T>),
    Expired,
    Corrupt(String),
}

impl<T> CacheRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(
        namespace: impl Into<String>,
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            store,
            clock,
            ttl_seconds,
            _payload: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Returns the payload only if present, unexpired and `expected_hash` matches.
    #[instrument(skip(self, expected_hash), fields(namespace = %self.namespace))]
    pub fn get(&self, key: &str, expected_hash: &str) -> CacheLookup<T> {
        let bytes = match self.store.read(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("Cache miss");
                return CacheLookup::Miss(MissReason::Absent);
            }
            Err(e) => {
                warn!(error = %e, "Cache read failed, treating as miss");
                return CacheLookup::Miss(MissReason::Unavailable);
            }
        };

        match self.inspect(&bytes) {
            Inspection::Corrupt(reason) => {
                warn!(reason = %reason, "Corrupt cache record, removing");
                self.discard(key);
                CacheLookup::Corrupt { reason }
            }
            Inspection::Expired => {
                debug!("Cache record expired, removing");
                self.discard(key);
                CacheLookup::Miss(MissReason::Expired)
            }
            Inspection::Valid(record) if record.metadata.content_hash != expected_hash => {
                debug!(
                    stored = %record.metadata.content_hash,
                    expected = %expected_hash,
                    "Content changed since caching, removing"
                );
                self.discard(key);
                CacheLookup::Miss(MissReason::ContentChanged)
            }
            Inspection::Valid(record) => {
                debug!("Cache hit");
                CacheLookup::Hit(record.data)
            }
        }
    }

    /// Writes with the repository TTL. Returns `false` (and logs) on failure.
    pub fn set(&self, key: &str, payload: &T, content_hash: &str) -> bool {
        self.set_with_ttl(key, payload, content_hash, self.ttl_seconds)
    }

    #[instrument(skip(self, payload, content_hash), fields(namespace = %self.namespace))]
    pub fn set_with_ttl(&self, key: &str, payload: &T, content_hash: &str, ttl_seconds: u64) -> bool {
        let record = CacheRecord {
            metadata: CacheEntryMeta::new(
                key,
                self.clock.now_epoch_secs(),
                ttl_seconds,
                content_hash,
            ),
            data: payload,
        };

        let bytes = match serde_json::to_vec_pretty(&record) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache record");
                return false;
            }
        };

        match self.store.write(key, &bytes) {
            Ok(()) => {
                debug!(bytes = bytes.len(), "Cache record stored");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to write cache record");
                false
            }
        }
    }

    /// Removes the record under `key`. Returns `true` if one existed.
    pub fn invalidate(&self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(removed) => {
                debug!(namespace = %self.namespace, key, removed, "Cache record invalidated");
                removed
            }
            Err(e) => {
                warn!(namespace = %self.namespace, key, error = %e, "Failed to invalidate cache record");
                false
            }
        }
    }

    /// Whether a record is stored under `key`, valid or not.
    pub fn contains(&self, key: &str) -> bool {
        self.store.exists(key)
    }

    /// Deletes every expired or undeserializable record; returns how many.
    ///
    /// Temp files left by interrupted writes are removed too but not counted.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub fn clear_expired(&self) -> usize {
        let mut removed = 0;
        for key in self.keys() {
            let stale = match self.store.read(&key) {
                Ok(Some(bytes)) => !matches!(self.inspect(&bytes), Inspection::Valid(_)),
                _ => false,
            };
            if stale && self.store.remove(&key).unwrap_or(false) {
                removed += 1;
            }
        }
        match self.store.purge_partial_writes() {
            Ok(0) => {}
            Ok(partial) => debug!(partial, "Removed leftovers of interrupted writes"),
            Err(e) => warn!(error = %e, "Failed to remove leftovers of interrupted writes"),
        }
        debug!(removed, "Swept expired cache records");
        removed
    }

    /// Deletes every record in the namespace; returns how many.
    pub fn clear(&self) -> usize {
        let removed = self
            .keys()
            .into_iter()
            .filter(|key| self.store.remove(key).unwrap_or(false))
            .count();
        debug!(namespace = %self.namespace, removed, "Cleared cache namespace");
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for key in self.keys() {
            let Ok(Some(bytes)) = self.store.read(&key) else {
                continue;
            };
            stats.entries += 1;
            stats.total_bytes += bytes.len() as u64;
            match self.inspect(&bytes) {
                Inspection::Valid(_) => {}
                Inspection::Expired => stats.expired += 1,
                Inspection::Corrupt(_) => stats.corrupt += 1,
            }
        }
        stats
    }

    fn keys(&self) -> Vec<String> {
        self.store.keys().unwrap_or_else(|e| {
            warn!(namespace = %self.namespace, error = %e, "Failed to list cache records");
            Vec::new()
        })
    }

    fn inspect(&self, bytes: &[u8]) -> Inspection<T> {
        match serde_json::from_slice::<CacheRecord<T>>(bytes) {
            Ok(record) if record.metadata.is_expired(self.clock.now_epoch_secs()) => {
                Inspection::Expired
            }
            Ok(record) => Inspection::Valid(record),
            Err(e) => Inspection::Corrupt(e.to_string()),
        }
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(namespace = %self.namespace, key, error = %e, "Failed to remove stale cache record");
        }
    }
}
