use std::time::Duration;

use super::{Debounce, RateLimit};
use crate::platform::Clock;

/// Trailing debounce for filter state that skips redundant fires.
///
/// A call whose arguments equal the last *released* arguments is dropped,
/// unless something else is already pending (then it must still win, since
/// it supersedes the pending value).
pub struct FilterDebounce<A, C: Clock> {
    inner: Debounce<A, C>,
    last_fired: Option<A>,
}

impl<A: PartialEq + Clone, C: Clock> FilterDebounce<A, C> {
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            inner: Debounce::new(clock, delay),
            last_fired: None,
        }
    }

    pub fn last_fired(&self) -> Option<&A> {
        self.last_fired.as_ref()
    }

    fn is_repeat(&self, args: &A) -> bool {
        !self.inner.is_pending() && self.last_fired.as_ref() == Some(args)
    }

    /// Skips the delay: drops whatever is pending and releases `args` now.
    fn fire_now(&mut self, args: A) -> Option<A> {
        self.inner.cancel();
        self.record(Some(args))
    }

    fn record(&mut self, released: Option<A>) -> Option<A> {
        if let Some(args) = &released {
            self.last_fired = Some(args.clone());
        }
        released
    }
}

impl<A: PartialEq + Clone, C: Clock> RateLimit<A> for FilterDebounce<A, C> {
    fn call(&mut self, args: A) -> Option<A> {
        if self.is_repeat(&args) {
            log::trace!("filter unchanged since last fire, skipping");
            return None;
        }
        let released = self.inner.call(args);
        self.record(released)
    }

    fn poll(&mut self) -> Option<A> {
        let released = self.inner.poll();
        self.record(released)
    }

    fn cancel(&mut self) {
        self.inner.cancel();
    }

    fn flush(&mut self) -> Option<A> {
        let released = self.inner.flush();
        self.record(released)
    }

    fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }

    fn remaining(&self) -> Option<Duration> {
        self.inner.remaining()
    }
}

/// Debounce for free-text search queries.
///
/// Behaves like [`FilterDebounce`] and additionally lets a blank query through
/// immediately: clearing the search box should restore the full catalog
/// without waiting.
pub struct SearchDebounce<C: Clock> {
    inner: FilterDebounce<String, C>,
}

impl<C: Clock> SearchDebounce<C> {
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            inner: FilterDebounce::new(clock, delay),
        }
    }

    pub fn last_fired(&self) -> Option<&str> {
        self.inner.last_fired().map(String::as_str)
    }
}

impl<C: Clock> RateLimit<String> for SearchDebounce<C> {
    fn call(&mut self, query: String) -> Option<String> {
        if self.inner.is_repeat(&query) {
            return None;
        }
        if query.trim().is_empty() {
            return self.inner.fire_now(query);
        }
        self.inner.call(query)
    }

    fn poll(&mut self) -> Option<String> {
        self.inner.poll()
    }

    fn cancel(&mut self) {
        self.inner.cancel();
    }

    fn flush(&mut self) -> Option<String> {
        self.inner.flush()
    }

    fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }

    fn remaining(&self) -> Option<Duration> {
        self.inner.remaining()
    }
}
