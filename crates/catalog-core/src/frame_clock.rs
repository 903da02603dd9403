//! Frame-synchronized callbacks.
//!
//! The host calls [`FrameClock::dispatch_frame`] once per rendered frame (from
//! `requestAnimationFrame`, a vsync callback or a fixed-rate loop). Callbacks
//! registered before the dispatch run exactly once in that frame; callbacks
//! registered while a frame is being dispatched wait for the next one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u64);

type FrameCallback = Box<dyn FnOnce(u64)>;

#[derive(Default)]
struct FrameClockInner {
    next_id: u64,
    callbacks: SmallVec<[(FrameCallbackId, FrameCallback); 4]>,
    frames_dispatched: u64,
}

/// Single-threaded registry of one-shot frame callbacks.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<FrameClockInner>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `callback` with the frame time in nanoseconds on the next frame.
    ///
    /// Dropping or cancelling the returned registration unschedules it.
    pub fn with_frame_nanos(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = FrameCallbackId(inner.next_id);
            inner.next_id += 1;
            inner.callbacks.push((id, Box::new(callback)));
            id
        };
        FrameCallbackRegistration {
            clock: self.clone(),
            id: Some(id),
        }
    }

    pub fn with_frame_millis(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> FrameCallbackRegistration {
        self.with_frame_nanos(move |nanos| callback(nanos / 1_000_000))
    }

    /// Whether any callback is waiting for a frame. Hosts that render on
    /// demand use this to decide whether to request one.
    pub fn has_pending_callbacks(&self) -> bool {
        !self.inner.borrow().callbacks.is_empty()
    }

    pub fn pending_callbacks(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }

    pub fn frames_dispatched(&self) -> u64 {
        self.inner.borrow().frames_dispatched
    }

    /// Runs every callback registered so far. Returns how many ran.
    pub fn dispatch_frame(&self, frame_time_nanos: u64) -> usize {
        let callbacks = {
            let mut inner = self.inner.borrow_mut();
            inner.frames_dispatched += 1;
            std::mem::take(&mut inner.callbacks)
        };
        let count = callbacks.len();
        if count > 0 {
            log::trace!("dispatching {count} frame callbacks at {frame_time_nanos}ns");
        }
        for (_, callback) in callbacks {
            callback(frame_time_nanos);
        }
        count
    }

    fn cancel(&self, id: FrameCallbackId) {
        // The callback may already have run; that is not an error.
        self.inner
            .borrow_mut()
            .callbacks
            .retain(|(pending, _)| *pending != id);
    }
}

impl fmt::Debug for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FrameClock")
            .field("pending_callbacks", &inner.callbacks.len())
            .field("frames_dispatched", &inner.frames_dispatched)
            .finish()
    }
}

/// Handle to a scheduled frame callback. Cancels the callback when dropped.
pub struct FrameCallbackRegistration {
    clock: FrameClock,
    id: Option<FrameCallbackId>,
}

impl FrameCallbackRegistration {
    pub fn id(&self) -> Option<FrameCallbackId> {
        self.id
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.clock.cancel(id);
        }
    }
}

impl Drop for FrameCallbackRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.clock.cancel(id);
        }
    }
}

impl fmt::Debug for FrameCallbackRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCallbackRegistration")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_callback_runs_once_on_next_frame() {
        let clock = FrameClock::new();
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);

        let registration = clock.with_frame_nanos(move |nanos| sink.set(Some(nanos)));
        assert!(clock.has_pending_callbacks());

        assert_eq!(clock.dispatch_frame(16_000_000), 1);
        assert_eq!(seen.get(), Some(16_000_000));

        // Already ran; a second frame has nothing to do
        assert_eq!(clock.dispatch_frame(32_000_000), 0);
        drop(registration);
    }

    #[test]
    fn test_cancel_prevents_callback() {
        let clock = FrameClock::new();
        let fired = Rc::new(Cell::new(false));
        let sink = Rc::clone(&fired);

        let registration = clock.with_frame_millis(move |_| sink.set(true));
        registration.cancel();

        assert!(!clock.has_pending_callbacks());
        clock.dispatch_frame(0);
        assert!(!fired.get());
    }

    #[test]
    fn test_dropping_registration_cancels() {
        let clock = FrameClock::new();
        {
            let _registration = clock.with_frame_nanos(|_| panic!("must not run"));
        }
        assert_eq!(clock.dispatch_frame(0), 0);
    }

    #[test]
    fn test_callbacks_registered_during_dispatch_wait_for_next_frame() {
        let clock = FrameClock::new();
        let runs = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<FrameCallbackRegistration>>> = Rc::default();

        let inner_clock = clock.clone();
        let inner_runs = Rc::clone(&runs);
        let inner_slot = Rc::clone(&slot);
        let outer = clock.with_frame_nanos(move |_| {
            inner_runs.set(inner_runs.get() + 1);
            let runs = Rc::clone(&inner_runs);
            let next = inner_clock.with_frame_nanos(move |_| runs.set(runs.get() + 1));
            *inner_slot.borrow_mut() = Some(next);
        });

        assert_eq!(clock.dispatch_frame(0), 1);
        assert_eq!(runs.get(), 1);
        assert_eq!(clock.dispatch_frame(1), 1);
        assert_eq!(runs.get(), 2);
        assert_eq!(clock.frames_dispatched(), 2);
        drop(outer);
    }
}
