use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::frame_clock::{FrameCallbackRegistration, FrameClock};

struct FrameThrottleState<A> {
    pending: Option<A>,
    registration: Option<FrameCallbackRegistration>,
    invocations: u64,
}

/// Runs `callback` at most once per frame with the newest arguments.
///
/// The first call in a frame schedules a [`FrameClock`] callback; later calls
/// in the same frame only replace the arguments it will see.
pub struct FrameThrottled<A, F> {
    clock: FrameClock,
    state: Rc<RefCell<FrameThrottleState<A>>>,
    callback: Rc<RefCell<F>>,
}

impl<A, F> FrameThrottled<A, F>
where
    A: 'static,
    F: FnMut(A) + 'static,
{
    pub fn new(clock: FrameClock, callback: F) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(FrameThrottleState {
                pending: None,
                registration: None,
                invocations: 0,
            })),
            callback: Rc::new(RefCell::new(callback)),
        }
    }

    pub fn call(&self, args: A) {
        {
            let mut state = self.state.borrow_mut();
            state.pending = Some(args);
            if state.registration.is_some() {
                return;
            }
        }

        let state = Rc::downgrade(&self.state);
        let callback = Rc::downgrade(&self.callback);
        let registration = self.clock.with_frame_nanos(move |_| {
            let Some(state) = state.upgrade() else {
                return;
            };
            let (registration, args) = {
                let mut state = state.borrow_mut();
                state.invocations += 1;
                (state.registration.take(), state.pending.take())
            };
            drop(registration);
            if let (Some(args), Some(callback)) = (args, callback.upgrade()) {
                (callback.borrow_mut())(args);
            }
        });
        self.state.borrow_mut().registration = Some(registration);
    }

    /// Drops the pending arguments and unschedules the frame callback.
    pub fn cancel(&self) {
        let registration = {
            let mut state = self.state.borrow_mut();
            state.pending = None;
            state.registration.take()
        };
        if let Some(registration) = registration {
            registration.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().registration.is_some()
    }

    /// Number of frames in which the callback was scheduled to run.
    pub fn invocations(&self) -> u64 {
        self.state.borrow().invocations
    }
}

impl<A, F> fmt::Debug for FrameThrottled<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("FrameThrottled")
            .field("pending", &state.pending.is_some())
            .field("invocations", &state.invocations)
            .finish()
    }
}
