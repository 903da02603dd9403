//! Standard runtime services for the catalog grid.
//!
//! Provides the wall-clock [`StdClock`] used by real hosts. `web-time` maps to
//! `std::time` on native targets and to `performance.now()` in the browser.

use catalog_core::{Clock, FrameClock};
use web_time::{Duration, Instant};

/// Clock implementation backed by [`web_time::Instant`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl StdClock {
    /// Returns the elapsed time as a [`Duration`] for convenience.
    pub fn elapsed(&self, since: Instant) -> Duration {
        since.elapsed()
    }
}

/// Convenience container bundling the wall clock with a frame clock.
#[derive(Clone, Debug)]
pub struct StdRuntime {
    clock: StdClock,
    frame_clock: FrameClock,
    started: Instant,
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl StdRuntime {
    pub fn new() -> Self {
        Self {
            clock: StdClock,
            frame_clock: FrameClock::new(),
            started: Instant::now(),
        }
    }

    pub fn clock(&self) -> StdClock {
        self.clock
    }

    pub fn frame_clock(&self) -> FrameClock {
        self.frame_clock.clone()
    }

    /// Dispatches one frame on the frame clock, stamped with the time since
    /// the runtime was created. Returns how many frame callbacks ran.
    pub fn pump_frame(&self) -> usize {
        let nanos = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.frame_clock.dispatch_frame(nanos)
    }
}
