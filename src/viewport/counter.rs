use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::observer::VisibilityWatcher;
use crate::config::CounterSettings;
use crate::dom;
use crate::scheduling::{BrowserTimer, Repeat, Timer};

const TARGET_ATTR: &str = "data-count";
const COUNTED_ATTR: &str = "data-counted";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Still ramping; the value to display for this frame.
    Running(i64),
    /// Landed exactly on the target.
    Finished(i64),
}

/// Linear ramp from zero to `target` in equal per-frame steps.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterRamp {
    current: f64,
    target: i64,
    step: f64,
    finished: bool,
}

impl CounterRamp {
    pub fn new(target: i64, duration_ms: u32, frame_ms: u32) -> Self {
        let frames = duration_ms as f64 / frame_ms.max(1) as f64;
        let step = if frames > 0.0 {
            target as f64 / frames
        } else {
            target as f64
        };
        Self {
            current: 0.0,
            target,
            step,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn advance(&mut self) -> Frame {
        if self.finished {
            return Frame::Finished(self.target);
        }
        self.current += self.step;
        if self.current < self.target as f64 {
            Frame::Running(self.current.floor() as i64)
        } else {
            self.finished = true;
            Frame::Finished(self.target)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterState {
    Idle,
    Running,
    Counted,
}

/// Per-counter lifecycle. A counter starts at most once.
#[derive(Debug, Default)]
pub struct CounterBoard {
    states: Vec<CounterState>,
}

impl CounterBoard {
    pub fn register(&mut self) -> usize {
        self.states.push(CounterState::Idle);
        self.states.len() - 1
    }

    pub fn state(&self, index: usize) -> Option<CounterState> {
        self.states.get(index).copied()
    }

    /// Returns `true` if this reading should start the counter's ramp.
    pub fn sight(&mut self, index: usize, intersecting: bool) -> bool {
        match self.states.get_mut(index) {
            Some(state) if intersecting && *state == CounterState::Idle => {
                *state = CounterState::Running;
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, index: usize) {
        if let Some(state) = self.states.get_mut(index) {
            *state = CounterState::Counted;
        }
    }
}

/// Drives `ramp` on `timer`, rendering every frame. The first frame is
/// rendered right away; `on_done` runs after the final one.
pub fn run_ramp<T: Timer>(
    timer: &T,
    mut ramp: CounterRamp,
    frame_ms: u32,
    mut render: impl FnMut(i64) + 'static,
    on_done: impl FnOnce() + 'static,
) -> Option<T::Handle> {
    let mut on_done = Some(on_done);
    let mut step = move || match ramp.advance() {
        Frame::Running(value) => {
            render(value);
            Repeat::Continue
        }
        Frame::Finished(value) => {
            if let Some(done) = on_done.take() {
                render(value);
                done();
            }
            Repeat::Stop
        }
    };
    if step() == Repeat::Stop {
        return None;
    }
    Some(timer.every(frame_ms, Box::new(step)))
}

fn parse_target(element: &Element) -> Option<i64> {
    let raw = element.get_attribute(TARGET_ATTR)?;
    match raw.trim().parse::<i64>() {
        Ok(target) => Some(target),
        Err(_) => {
            warn!("ignoring counter with non-numeric {}={:?}", TARGET_ATTR, raw);
            None
        }
    }
}

pub fn init(document: &Document, settings: &CounterSettings) -> Result<(), JsValue> {
    let counters: Vec<(Element, i64)> = dom::select_all(document, "[data-count]")
        .into_iter()
        .filter_map(|e| parse_target(&e).map(|t| (e, t)))
        .collect();
    if counters.is_empty() {
        debug!("no counters on this page");
        return Ok(());
    }

    let board = Rc::new(RefCell::new(CounterBoard::default()));
    let targets: Rc<Vec<i64>> = Rc::new(counters.iter().map(|(_, t)| *t).collect());
    // Ramp handles stay here so a ramp can be cancelled by dropping its slot.
    let ramps: Rc<RefCell<Vec<Option<<BrowserTimer as Timer>::Handle>>>> =
        Rc::new(RefCell::new(counters.iter().map(|_| None).collect()));

    let watcher_board = board.clone();
    let settings = settings.clone();
    let watcher = VisibilityWatcher::new(settings.threshold, None, move |batch, _| {
        for sighting in batch {
            let element = sighting.target;
            let Some(index) = element
                .get_attribute("data-counter-index")
                .and_then(|i| i.parse::<usize>().ok())
            else {
                continue;
            };
            if element.has_attribute(COUNTED_ATTR)
                || !watcher_board.borrow_mut().sight(index, sighting.intersecting)
            {
                continue;
            }

            let ramp = CounterRamp::new(targets[index], settings.duration_ms, settings.frame_ms);
            let shown = element.clone();
            let done_board = watcher_board.clone();
            let handle = run_ramp(
                &BrowserTimer,
                ramp,
                settings.frame_ms,
                move |value| shown.set_text_content(Some(&value.to_string())),
                move || {
                    let _ = element.set_attribute(COUNTED_ATTR, "true");
                    done_board.borrow_mut().finish(index);
                },
            );
            if let Some(slot) = ramps.borrow_mut().get_mut(index) {
                *slot = handle;
            }
        }
    })?;

    for (element, _) in &counters {
        let index = board.borrow_mut().register();
        element.set_attribute("data-counter-index", &index.to_string())?;
        element.set_text_content(Some("0"));
        watcher.observe(element);
    }
    debug!("watching {} counter(s)", counters.len());
    Ok(())
}
