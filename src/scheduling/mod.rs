use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};

pub mod debounce;
pub mod throttle;
#[cfg(test)]
pub mod manual;

pub use debounce::Debouncer;
pub use throttle::Throttle;

/// Whether a repeating task wants another tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Continue,
    Stop,
}

/// Delayed and repeating callbacks. Dropping a handle cancels whatever it
/// still has pending.
pub trait Timer: Clone + 'static {
    type Handle: 'static;

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;

    /// Runs `tick` every `period_ms` until it returns [`Repeat::Stop`] or
    /// the handle is dropped.
    fn every(&self, period_ms: u32, tick: Box<dyn FnMut() -> Repeat>) -> Self::Handle;
}

/// `setTimeout`/`setInterval` through gloo.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTimer;

pub enum BrowserHandle {
    Once(Timeout),
    Repeating(Rc<RefCell<Option<Interval>>>),
}

impl Timer for BrowserTimer {
    type Handle = BrowserHandle;

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> BrowserHandle {
        BrowserHandle::Once(Timeout::new(delay_ms, task))
    }

    fn every(&self, period_ms: u32, mut tick: Box<dyn FnMut() -> Repeat>) -> BrowserHandle {
        let slot: Rc<RefCell<Option<Interval>>> = Rc::default();
        let weak = Rc::downgrade(&slot);
        let interval = Interval::new(period_ms, move || {
            if tick() == Repeat::Stop {
                let finished = weak.upgrade().and_then(|slot| slot.borrow_mut().take());
                if let Some(interval) = finished {
                    // The interval's closure is still on the stack here, so the
                    // drop has to wait for the next turn of the event loop.
                    Timeout::new(0, move || drop(interval)).forget();
                }
            }
        });
        *slot.borrow_mut() = Some(interval);
        BrowserHandle::Repeating(slot)
    }
}
