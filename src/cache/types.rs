use serde::{Deserialize, Serialize};

/// Metadata block persisted alongside every cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryMeta {
    pub key: String,
    /// Epoch seconds.
    pub created_at: i64,
    pub ttl_seconds: u64,
    /// Full hash of the content the payload was derived from.
    pub content_hash: String,
}

impl CacheEntryMeta {
    pub fn new(
        key: impl Into<String>,
        created_at: i64,
        ttl_seconds: u64,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            created_at,
            ttl_seconds,
            content_hash: content_hash.into(),
        }
    }

    /// `now - created_at > ttl_seconds`.
    #[inline]
    pub fn is_expired(&self, now: i64) -> bool {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        now.saturating_sub(self.created_at) > ttl
    }
}

/// On-disk record: `{ "_metadata": {...}, "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord<T> {
    #[serde(rename = "_metadata")]
    pub metadata: CacheEntryMeta,
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// Never cached, or already removed.
    Absent,
    Expired,
    /// Stored hash differs from the hash of the current content.
    ContentChanged,
    /// The backing store could not be read.
    Unavailable,
}

impl MissReason {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::Absent => "absent",
            MissReason::Expired => "expired",
            MissReason::ContentChanged => "content_changed",
            MissReason::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for MissReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss(MissReason),
    /// The stored record could not be deserialized; it has been removed.
    Corrupt { reason: String },
}

impl<T> CacheLookup<T> {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    /// The payload on a hit, `None` otherwise.
    pub fn into_hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            _ => None,
        }
    }

    pub fn status(&self) -> CacheStatus {
        match self {
            CacheLookup::Hit(_) => CacheStatus::Hit,
            CacheLookup::Miss(_) => CacheStatus::Miss,
            CacheLookup::Corrupt { .. } => CacheStatus::Corrupt,
        }
    }
}

/// Coarse lookup outcome reported to callers of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Hit,
    Miss,
    Corrupt,
    /// The cache was not consulted.
    Bypassed,
}

impl CacheStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Corrupt => "CORRUPT",
            CacheStatus::Bypassed => "BYPASSED",
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a cache namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub expired: usize,
    pub corrupt: usize,
    pub total_bytes: u64,
}

impl std::ops::Add for CacheStats {
    type Output = CacheStats;

    fn add(self, rhs: CacheStats) -> CacheStats {
        CacheStats {
            entries: self.entries + rhs.entries,
            expired: self.expired + rhs.expired,
            corrupt: self.corrupt + rhs.corrupt,
            total_bytes: self.total_bytes + rhs.total_bytes,
        }
    }
}
