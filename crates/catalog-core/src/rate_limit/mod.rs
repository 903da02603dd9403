//! Debounce, throttle and frame-coalescing primitives.
//!
//! The timer-based limiters ([`Debounce`], [`Throttle`] and the query
//! wrappers) are *gates*: they decide when a call should go through and hand
//! the winning arguments back to the caller instead of invoking anything
//! themselves. That lets an owner such as the grid's render coordinator keep
//! its limiters as plain fields and react to them without closures that
//! capture the owner. [`RateLimited`] pairs a gate with a callback for the
//! classic "wrapped function" shape.
//!
//! Gates never spawn timers. A trailing invocation is delivered by
//! [`RateLimit::poll`]; [`RateLimit::remaining`] says how long the host may
//! sleep before polling again.

mod debounce;
mod frame;
mod query;
mod throttle;

use std::marker::PhantomData;
use std::time::Duration;

pub use debounce::Debounce;
pub use frame::FrameThrottled;
pub use query::{FilterDebounce, SearchDebounce};
pub use throttle::{Throttle, ThrottleOptions};

/// Common contract of the timer-based gates.
pub trait RateLimit<A> {
    /// Registers a call. Returns the arguments to invoke with right now, if the
    /// leading edge (or an immediate/bypass rule) lets this call through.
    fn call(&mut self, args: A) -> Option<A>;

    /// Returns the pending arguments once their trailing invocation is due.
    fn poll(&mut self) -> Option<A>;

    /// Drops any pending invocation.
    fn cancel(&mut self);

    /// Takes the pending invocation immediately, if there is one.
    fn flush(&mut self) -> Option<A>;

    fn is_pending(&self) -> bool;

    /// Time until the pending invocation becomes due. `None` when idle.
    fn remaining(&self) -> Option<Duration>;
}

/// A gate plus the function it guards.
///
/// ```
/// use std::time::Duration;
/// use catalog_core::{Debounce, ManualClock, RateLimited};
///
/// let clock = ManualClock::new();
/// let mut fired = Vec::new();
/// {
///     let mut save = RateLimited::new(
///         Debounce::new(clock.clone(), Duration::from_millis(100)),
///         |value: u32| fired.push(value),
///     );
///     save.call(1);
///     save.call(2);
///     clock.advance_millis(100);
///     assert!(save.poll());
/// }
/// assert_eq!(fired, vec![2]);
/// ```
pub struct RateLimited<L, F, A> {
    limiter: L,
    callback: F,
    _args: PhantomData<fn(A)>,
}

impl<L, F, A> RateLimited<L, F, A>
where
    L: RateLimit<A>,
    F: FnMut(A),
{
    pub fn new(limiter: L, callback: F) -> Self {
        Self {
            limiter,
            callback,
            _args: PhantomData,
        }
    }

    /// Calls through the gate. Returns whether the callback ran.
    pub fn call(&mut self, args: A) -> bool {
        let released = self.limiter.call(args);
        self.run(released)
    }

    /// Delivers a due trailing invocation. Returns whether the callback ran.
    pub fn poll(&mut self) -> bool {
        let released = self.limiter.poll();
        self.run(released)
    }

    pub fn flush(&mut self) -> bool {
        let released = self.limiter.flush();
        self.run(released)
    }

    pub fn cancel(&mut self) {
        self.limiter.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.limiter.is_pending()
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.limiter.remaining()
    }

    pub fn limiter(&self) -> &L {
        &self.limiter
    }

    fn run(&mut self, released: Option<A>) -> bool {
        match released {
            Some(args) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn remaining_after(total_millis: u64, elapsed_millis: u64) -> Duration {
    Duration::from_millis(total_millis.saturating_sub(elapsed_millis))
}
