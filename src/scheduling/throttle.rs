use std::cell::Cell;
use std::rc::Rc;

use super::Timer;

/// Runs the first call immediately, then drops every call until
/// `limit_ms` has passed. Dropped calls are not replayed.
pub struct Throttle<T: Timer> {
    timer: T,
    limit_ms: u32,
    cooling: Rc<Cell<bool>>,
    cooldown: Option<T::Handle>,
}

impl<T: Timer> Throttle<T> {
    pub fn new(timer: T, limit_ms: u32) -> Self {
        Self {
            timer,
            limit_ms,
            cooling: Rc::new(Cell::new(false)),
            cooldown: None,
        }
    }

    /// Returns whether `task` actually ran.
    pub fn call(&mut self, task: impl FnOnce()) -> bool {
        if self.cooling.get() {
            return false;
        }
        task();
        self.cooling.set(true);
        let cooling = self.cooling.clone();
        self.cooldown = Some(
            self.timer
                .after(self.limit_ms, Box::new(move || cooling.set(false))),
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::manual::ManualTimer;

    #[test]
    fn burst_inside_window_runs_once() {
        let timer = ManualTimer::default();
        let mut throttle = Throttle::new(timer.clone(), 100);
        let mut runs = 0;

        for _ in 0..10 {
            throttle.call(|| runs += 1);
            timer.advance(5);
        }

        assert_eq!(runs, 1);
    }

    #[test]
    fn call_after_window_runs_again() {
        let timer = ManualTimer::default();
        let mut throttle = Throttle::new(timer.clone(), 100);
        let mut runs = 0;

        assert!(throttle.call(|| runs += 1));
        timer.advance(99);
        assert!(!throttle.call(|| runs += 1));
        timer.advance(1);
        assert!(throttle.call(|| runs += 1));

        assert_eq!(runs, 2);
    }

    #[test]
    fn trailing_calls_are_not_queued() {
        let timer = ManualTimer::default();
        let mut throttle = Throttle::new(timer.clone(), 200);
        let mut runs = 0;

        throttle.call(|| runs += 1);
        throttle.call(|| runs += 1);
        throttle.call(|| runs += 1);
        timer.advance(1_000);

        assert_eq!(runs, 1);
    }
}
