use std::fmt;
use std::time::Duration;

use super::{millis, remaining_after, RateLimit};
use crate::platform::Clock;

/// Collapses a burst of calls into one.
///
/// In the default trailing mode every call restarts the timer and the last
/// call's arguments are released `delay` after the burst goes quiet. In
/// immediate mode the first call of a burst is released at once and the rest
/// of the burst is swallowed; a burst ends once `delay` passes without calls.
pub struct Debounce<A, C: Clock> {
    clock: C,
    delay_millis: u64,
    immediate: bool,
    pending: Option<A>,
    last_call: Option<C::Instant>,
}

impl<A, C: Clock> Debounce<A, C> {
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            clock,
            delay_millis: millis(delay),
            immediate: false,
            pending: None,
            last_call: None,
        }
    }

    /// Fires on the leading call of each burst instead of the trailing one.
    pub fn immediate(clock: C, delay: Duration) -> Self {
        Self {
            immediate: true,
            ..Self::new(clock, delay)
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate
    }

    fn quiet_for_delay(&self) -> bool {
        match self.last_call {
            Some(at) => self.clock.elapsed_millis(at) >= self.delay_millis,
            None => true,
        }
    }
}

impl<A, C: Clock> RateLimit<A> for Debounce<A, C> {
    fn call(&mut self, args: A) -> Option<A> {
        let burst_starts = self.quiet_for_delay();
        self.last_call = Some(self.clock.now());

        if self.immediate {
            return burst_starts.then_some(args);
        }
        self.pending = Some(args);
        None
    }

    fn poll(&mut self) -> Option<A> {
        if self.pending.is_some() && self.quiet_for_delay() {
            self.last_call = None;
            return self.pending.take();
        }
        None
    }

    fn cancel(&mut self) {
        self.pending = None;
        self.last_call = None;
    }

    fn flush(&mut self) -> Option<A> {
        let pending = self.pending.take();
        if pending.is_some() {
            self.last_call = None;
        }
        pending
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref()?;
        let elapsed = self
            .last_call
            .map_or(self.delay_millis, |at| self.clock.elapsed_millis(at));
        Some(remaining_after(self.delay_millis, elapsed))
    }
}

impl<A, C: Clock> fmt::Debug for Debounce<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounce")
            .field("delay_millis", &self.delay_millis)
            .field("immediate", &self.immediate)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn debounce(clock: &ManualClock) -> Debounce<&'static str, ManualClock> {
        Debounce::new(clock.clone(), Duration::from_millis(100))
    }

    #[test]
    fn test_burst_fires_once_after_last_call() {
        let clock = ManualClock::new();
        let mut gate = debounce(&clock);

        // Calls at t, t+10, t+20
        assert_eq!(gate.call("first"), None);
        clock.advance_millis(10);
        assert_eq!(gate.call("second"), None);
        clock.advance_millis(10);
        assert_eq!(gate.call("third"), None);

        // t+119: still waiting
        clock.advance_millis(99);
        assert_eq!(gate.poll(), None);
        assert_eq!(gate.remaining(), Some(Duration::from_millis(1)));

        // t+120: fires with the arguments of the t+20 call
        clock.advance_millis(1);
        assert_eq!(gate.poll(), Some("third"));
        assert_eq!(gate.poll(), None);
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_immediate_mode_fires_on_leading_call_only() {
        let clock = ManualClock::new();
        let mut gate = Debounce::immediate(clock.clone(), Duration::from_millis(100));

        assert_eq!(gate.call(1), Some(1));
        clock.advance_millis(50);
        assert_eq!(gate.call(2), None);
        clock.advance_millis(50);
        // 50ms after the previous call: the burst is still going
        assert_eq!(gate.call(3), None);

        // No trailing fire in immediate mode
        clock.advance_millis(500);
        assert_eq!(gate.poll(), None);

        // Quiet long enough, a new burst starts
        assert_eq!(gate.call(4), Some(4));
    }

    #[test]
    fn test_cancel_discards_pending_call() {
        let clock = ManualClock::new();
        let mut gate = debounce(&clock);

        gate.call("draft");
        gate.cancel();
        clock.advance_millis(200);

        assert_eq!(gate.poll(), None);
        assert_eq!(gate.remaining(), None);
    }

    #[test]
    fn test_flush_releases_latest_pending_call() {
        let clock = ManualClock::new();
        let mut gate = debounce(&clock);

        gate.call("a");
        gate.call("b");
        assert_eq!(gate.flush(), Some("b"));
        assert_eq!(gate.flush(), None);

        clock.advance_millis(200);
        assert_eq!(gate.poll(), None);
    }
}
