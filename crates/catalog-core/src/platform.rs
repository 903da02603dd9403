//! Platform abstraction for time.
//!
//! The grid never calls `Instant::now()` directly. Hosts hand it a [`Clock`]
//! so that rate limiting behaves identically on native, wasm and in tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// A clock that only moves when told to.
///
/// Clones share the same time source, so a test (or a replaying host) can keep
/// one handle and advance time while the grid holds another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now_millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock that starts at `millis`.
    pub fn starting_at(millis: u64) -> Self {
        Self {
            now_millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.advance_millis(u64::try_from(by.as_millis()).unwrap_or(u64::MAX));
    }

    pub fn advance_millis(&self, millis: u64) {
        self.now_millis.fetch_add(millis, Ordering::SeqCst);
    }

    /// Jumps to an absolute time. Going backwards is ignored.
    pub fn set_millis(&self, millis: u64) {
        self.now_millis.fetch_max(millis, Ordering::SeqCst);
    }

    pub fn now_millis(&self) -> u64 {
        self.now_millis.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> Self::Instant {
        self.now_millis()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        self.now_millis().saturating_sub(since)
    }
}
