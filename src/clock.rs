//! Wall-clock source for cache timestamps.

/// Supplies "now" as epoch seconds.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now_epoch_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
/// UTC system time.
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
/// Manually advanced clock for expiry tests.
pub struct ManualClock {
    now: std::sync::atomic::AtomicI64,
}

#[cfg(any(test, feature = "mock"))]
impl ManualClock {
    pub fn new(start: i64) -> Self {
        Self {
            now: std::sync::atomic::AtomicI64::new(start),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now
            .fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, secs: i64) {
        self.now.store(secs, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "mock"))]
impl Clock for ManualClock {
    fn now_epoch_secs(&self) -> i64 {
        self.now.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2023-11-14, well before any test run.
        assert!(SystemClock.now_epoch_secs() > 1_700_000_000);
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_epoch_secs(), 100);

        clock.advance(5);
        assert_eq!(clock.now_epoch_secs(), 105);

        clock.set(10);
        assert_eq!(clock.now_epoch_secs(), 10);
    }
}
