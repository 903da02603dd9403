//! Host-agnostic runtime services for the catalog grid.
//!
//! Nothing in this crate owns a thread, a timer or an event loop. Time is read
//! through the [`Clock`] trait, frame-synchronized work is queued on a
//! [`FrameClock`] that the host drives once per rendered frame, and the
//! rate limiters in [`rate_limit`] report their next deadline so the host can
//! decide when to wake up and call `poll()`.

pub mod collections;
pub mod frame_clock;
pub mod platform;
pub mod rate_limit;

pub use frame_clock::{FrameCallbackId, FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, ManualClock};
pub use rate_limit::{
    Debounce, FilterDebounce, FrameThrottled, RateLimit, RateLimited, SearchDebounce, Throttle,
    ThrottleOptions,
};
