use std::fmt;
use std::time::Duration;

use super::{millis, remaining_after, RateLimit};
use crate::platform::Clock;

/// Which edges of a throttle window release a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThrottleOptions {
    /// Release the first call of a window immediately.
    pub leading: bool,
    /// Release the latest call that arrived during the cooldown once it ends.
    pub trailing: bool,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            leading: true,
            trailing: true,
        }
    }
}

impl ThrottleOptions {
    pub fn leading_only() -> Self {
        Self {
            leading: true,
            trailing: false,
        }
    }

    pub fn trailing_only() -> Self {
        Self {
            leading: false,
            trailing: true,
        }
    }
}

/// Releases at most one call per `interval`.
///
/// Every release (leading or trailing) starts a new cooldown. Calls that land
/// inside the cooldown overwrite each other; only the newest survives to the
/// trailing edge.
pub struct Throttle<A, C: Clock> {
    clock: C,
    interval_millis: u64,
    options: ThrottleOptions,
    window_start: Option<C::Instant>,
    pending: Option<A>,
}

impl<A, C: Clock> Throttle<A, C> {
    /// Leading and trailing throttle.
    pub fn new(clock: C, interval: Duration) -> Self {
        Self::with_options(clock, interval, ThrottleOptions::default())
    }

    pub fn with_options(clock: C, interval: Duration, options: ThrottleOptions) -> Self {
        Self {
            clock,
            interval_millis: millis(interval),
            options,
            window_start: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_millis)
    }

    pub fn options(&self) -> ThrottleOptions {
        self.options
    }

    fn cooling_down(&self) -> bool {
        self.window_start
            .is_some_and(|start| self.clock.elapsed_millis(start) < self.interval_millis)
    }
}

impl<A, C: Clock> RateLimit<A> for Throttle<A, C> {
    fn call(&mut self, args: A) -> Option<A> {
        if self.cooling_down() {
            if self.options.trailing {
                self.pending = Some(args);
            }
            return None;
        }

        if self.options.leading {
            // A stale trailing call the host never polled loses to this newer one
            self.pending = None;
            self.window_start = Some(self.clock.now());
            return Some(args);
        }

        if self.options.trailing {
            // Trailing-only: this call opens the window and waits for its end
            if self.pending.is_none() {
                self.window_start = Some(self.clock.now());
            }
            self.pending = Some(args);
        }
        None
    }

    fn poll(&mut self) -> Option<A> {
        if self.pending.is_none() || self.cooling_down() {
            return None;
        }
        self.window_start = Some(self.clock.now());
        self.pending.take()
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.window_start = None;
    }

    fn flush(&mut self) -> Option<A> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.window_start = Some(self.clock.now());
        }
        pending
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref()?;
        let elapsed = self
            .window_start
            .map_or(self.interval_millis, |start| self.clock.elapsed_millis(start));
        Some(remaining_after(self.interval_millis, elapsed))
    }
}

impl<A, C: Clock> fmt::Debug for Throttle<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttle")
            .field("interval_millis", &self.interval_millis)
            .field("options", &self.options)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    const INTERVAL: Duration = Duration::from_millis(100);

    #[test]
    fn test_leading_only_fires_at_start_and_after_cooldown() {
        let clock = ManualClock::new();
        let mut gate = Throttle::with_options(clock.clone(), INTERVAL, ThrottleOptions::leading_only());

        // Calls at t, t+30, t+60, t+150
        assert_eq!(gate.call("t"), Some("t"));
        clock.set_millis(30);
        assert_eq!(gate.call("t+30"), None);
        clock.set_millis(60);
        assert_eq!(gate.call("t+60"), None);
        clock.set_millis(150);
        assert_eq!(gate.call("t+150"), Some("t+150"));

        // Nothing trails
        clock.set_millis(400);
        assert_eq!(gate.poll(), None);
    }

    #[test]
    fn test_trailing_edge_carries_latest_args() {
        let clock = ManualClock::new();
        let mut gate = Throttle::new(clock.clone(), INTERVAL);

        assert_eq!(gate.call("t"), Some("t"));
        clock.set_millis(30);
        assert_eq!(gate.call("t+30"), None);
        clock.set_millis(60);
        assert_eq!(gate.call("t+60"), None);
        assert_eq!(gate.remaining(), Some(Duration::from_millis(40)));

        clock.set_millis(99);
        assert_eq!(gate.poll(), None);
        clock.set_millis(100);
        assert_eq!(gate.poll(), Some("t+60"));

        // The trailing release started a new cooldown
        clock.set_millis(150);
        assert_eq!(gate.call("t+150"), None);
        clock.set_millis(200);
        assert_eq!(gate.poll(), Some("t+150"));
    }

    #[test]
    fn test_trailing_only_waits_for_window_end() {
        let clock = ManualClock::new();
        let mut gate = Throttle::with_options(clock.clone(), INTERVAL, ThrottleOptions::trailing_only());

        assert_eq!(gate.call(1), None);
        clock.set_millis(40);
        assert_eq!(gate.call(2), None);
        clock.set_millis(100);
        assert_eq!(gate.poll(), Some(2));
        assert_eq!(gate.poll(), None);
    }

    #[test]
    fn test_cancel_resets_cooldown() {
        let clock = ManualClock::new();
        let mut gate = Throttle::new(clock.clone(), INTERVAL);

        assert_eq!(gate.call(1), Some(1));
        clock.set_millis(10);
        assert_eq!(gate.call(2), None);

        gate.cancel();
        assert!(!gate.is_pending());
        // Cooldown is gone, so the next call leads immediately
        assert_eq!(gate.call(3), Some(3));
    }

    #[test]
    fn test_late_poll_loses_to_newer_leading_call() {
        let clock = ManualClock::new();
        let mut gate = Throttle::new(clock.clone(), INTERVAL);

        gate.call("a");
        clock.set_millis(20);
        gate.call("b");
        // Host never polled; the next call arrives well after the cooldown
        clock.set_millis(500);
        assert_eq!(gate.call("c"), Some("c"));
        assert_eq!(gate.poll(), None);
    }
}
