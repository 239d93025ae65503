//! Deterministic stand-in for the browser timer. Time only moves when a
//! test calls [`ManualTimer::advance`].

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use super::{Repeat, Timer};

enum Task {
    Once(Box<dyn FnOnce()>),
    Every {
        period: u64,
        tick: Box<dyn FnMut() -> Repeat>,
    },
}

struct Scheduled {
    id: u64,
    due: u64,
    task: Task,
}

#[derive(Default)]
struct Queue {
    now: u64,
    next_id: u64,
    scheduled: Vec<Scheduled>,
    // Handles dropped while their task was running.
    cancelled: HashSet<u64>,
}

#[derive(Clone, Default)]
pub struct ManualTimer {
    queue: Rc<RefCell<Queue>>,
}

pub struct ManualHandle {
    id: u64,
    queue: Weak<RefCell<Queue>>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        let Some(queue) = self.queue.upgrade() else {
            return;
        };
        // Removed tasks are dropped after the borrow ends: their closures may
        // own handles of their own.
        let removed: Vec<Scheduled> = {
            let mut queue = queue.borrow_mut();
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut queue.scheduled)
                .into_iter()
                .partition(|s| s.id == self.id);
            queue.scheduled = kept;
            if removed.is_empty() {
                queue.cancelled.insert(self.id);
            }
            removed
        };
        drop(removed);
    }
}

impl ManualTimer {
    pub fn now(&self) -> u64 {
        self.queue.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().scheduled.len()
    }

    /// Moves the clock forward, running every task that falls due on the
    /// way in due-time order.
    pub fn advance(&self, ms: u64) {
        let target = self.queue.borrow().now + ms;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let earliest = queue
                    .scheduled
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.due <= target)
                    .min_by_key(|(_, s)| (s.due, s.id))
                    .map(|(i, _)| i);
                earliest.map(|i| {
                    let scheduled = queue.scheduled.remove(i);
                    queue.now = scheduled.due;
                    scheduled
                })
            };
            let Some(Scheduled { id, due, task }) = next else {
                break;
            };
            match task {
                Task::Once(task) => task(),
                Task::Every { period, mut tick } => {
                    if tick() == Repeat::Continue {
                        let mut queue = self.queue.borrow_mut();
                        if !queue.cancelled.remove(&id) {
                            queue.scheduled.push(Scheduled {
                                id,
                                due: due + period,
                                task: Task::Every { period, tick },
                            });
                        }
                    }
                }
            }
        }
        self.queue.borrow_mut().now = target;
    }

    fn push(&self, delay: u64, task: Task) -> ManualHandle {
        let mut queue = self.queue.borrow_mut();
        let id = queue.next_id;
        queue.next_id += 1;
        let due = queue.now + delay;
        queue.scheduled.push(Scheduled { id, due, task });
        ManualHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        }
    }
}

impl Timer for ManualTimer {
    type Handle = ManualHandle;

    fn after(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualHandle {
        self.push(delay_ms as u64, Task::Once(task))
    }

    fn every(&self, period_ms: u32, tick: Box<dyn FnMut() -> Repeat>) -> ManualHandle {
        // A zero period would spin forever inside `advance`.
        let period = (period_ms as u64).max(1);
        self.push(
            period,
            Task::Every {
                period,
                tick,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn tasks_run_in_due_order() {
        let timer = ManualTimer::default();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let _late = timer.after(20, Box::new(move || a.borrow_mut().push("late")));
        let _early = timer.after(10, Box::new(move || b.borrow_mut().push("early")));

        timer.advance(25);

        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(timer.now(), 25);
    }

    #[test]
    fn dropping_a_handle_cancels() {
        let timer = ManualTimer::default();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        let handle = timer.after(10, Box::new(move || flag.set(true)));
        drop(handle);

        timer.advance(100);
        assert!(!fired.get());
    }

    #[test]
    fn repeating_task_stops_itself() {
        let timer = ManualTimer::default();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        let _handle = timer.every(
            16,
            Box::new(move || {
                counter.set(counter.get() + 1);
                if counter.get() == 3 {
                    Repeat::Stop
                } else {
                    Repeat::Continue
                }
            }),
        );

        timer.advance(1_000);
        assert_eq!(ticks.get(), 3);
        assert_eq!(timer.pending(), 0);
    }
}
