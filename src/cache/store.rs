//! Record stores: where serialized cache records live.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::{StoreError, StoreResult};

const RECORD_EXTENSION: &str = "json";
const TEMP_PREFIX: &str = ".tmp";

/// Byte-level storage of cache records, one record per key.
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Returns `Ok(None)` if no record exists under `key`.
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replaces the record under `key`. Readers see the old or the new bytes, never a mix.
    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Returns `true` if a record was removed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    fn exists(&self, key: &str) -> bool;

    /// All keys, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Removes leftovers of interrupted writes; returns how many.
    fn purge_partial_writes(&self) -> StoreResult<usize> {
        Ok(0)
    }
}

/// Accepts flat names made of ASCII alphanumerics, `_`, `-` and `.` (not leading).
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
/// File-per-record store rooted at a namespace directory.
///
/// Writes go to a temp file in the same directory which is then renamed over the
/// target, so a crash mid-write leaves either the previous record or none.
/// Concurrent writers resolve last-writer-wins.
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, RECORD_EXTENSION)))
    }

    fn ensure_root(&self) -> StoreResult<()> {
        if !self.root.is_dir() {
            fs::create_dir_all(&self.root).map_err(|_| StoreError::Unavailable {
                path: self.root.clone(),
            })?;
        }
        Ok(())
    }
}

impl RecordStore for FsRecordStore {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.record_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.record_path(key)?;
        self.ensure_root()?;

        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.root)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.record_path(key).map(|p| p.is_file()).unwrap_or(false)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == RECORD_EXTENSION
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn purge_partial_writes(&self) -> StoreResult<usize> {
        if !self.root.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let is_temp = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(TEMP_PREFIX));
            if is_temp && path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
/// In-memory store whose writes can be made to fail.
pub struct MemoryRecordStore {
    records: parking_lot::RwLock<std::collections::BTreeMap<String, Vec<u8>>>,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(any(test, feature = "mock"))]
impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with [`StoreError::WriteFailed`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Stores raw bytes, bypassing serialization (for corruption tests).
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.records.write().insert(key.to_string(), bytes.to_vec());
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[cfg(any(test, feature = "mock"))]
impl RecordStore for MemoryRecordStore {
    fn read(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.records.read().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StoreError::WriteFailed("memory store is read-only".to_string()));
        }
        self.records.write().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        Ok(self.records.write().remove(key).is_some())
    }

    fn exists(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.records.read().keys().cloned().collect())
    }
}
