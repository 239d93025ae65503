use super::Timer;

/// Coalesces bursts of calls into one task that runs `delay_ms` after the
/// last call. Each call cancels whatever the previous one scheduled.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay_ms: u32,
    pending: Option<T::Handle>,
}

impl<T: Timer> Debouncer<T> {
    pub fn new(timer: T, delay_ms: u32) -> Self {
        Self {
            timer,
            delay_ms,
            pending: None,
        }
    }

    pub fn call(&mut self, task: impl FnOnce() + 'static) {
        self.pending.take();
        self.pending = Some(self.timer.after(self.delay_ms, Box::new(task)));
    }

    pub fn cancel(&mut self) {
        self.pending.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::manual::ManualTimer;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let calls = Rc::new(Cell::new(0));
        let handle = calls.clone();
        (calls, move || {
            let calls = handle.clone();
            Box::new(move || calls.set(calls.get() + 1)) as Box<dyn FnOnce()>
        })
    }

    #[test]
    fn burst_collapses_into_one_call_timed_from_last_event() {
        let timer = ManualTimer::default();
        let mut debouncer = Debouncer::new(timer.clone(), 500);
        let (calls, task) = counting();

        debouncer.call(task());
        timer.advance(100);
        debouncer.call(task());
        timer.advance(100);
        debouncer.call(task());

        timer.advance(499);
        assert_eq!(calls.get(), 0);
        timer.advance(1);
        assert_eq!(calls.get(), 1);

        timer.advance(5_000);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn separate_quiet_periods_each_fire() {
        let timer = ManualTimer::default();
        let mut debouncer = Debouncer::new(timer.clone(), 500);
        let (calls, task) = counting();

        debouncer.call(task());
        timer.advance(500);
        debouncer.call(task());
        timer.advance(500);

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn cancel_drops_the_pending_call() {
        let timer = ManualTimer::default();
        let mut debouncer = Debouncer::new(timer.clone(), 500);
        let (calls, task) = counting();

        debouncer.call(task());
        debouncer.cancel();
        timer.advance(1_000);

        assert_eq!(calls.get(), 0);
        assert_eq!(timer.pending(), 0);
    }
}
