use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use super::observer::VisibilityWatcher;
use crate::config::RevealSettings;
use crate::dom;

const INDEX_ATTR: &str = "data-reveal-index";
const VISIBLE_CLASS: &str = "is-visible";
const VISIBLE_CSS: &str = r#"
      .is-visible {
        opacity: 1 !important;
        transform: translateY(0) !important;
      }
"#;

/// Which watched elements have been revealed. Revealing is one-way.
#[derive(Debug, Default)]
pub struct RevealBoard {
    revealed: Vec<bool>,
}

impl RevealBoard {
    pub fn register(&mut self) -> usize {
        self.revealed.push(false);
        self.revealed.len() - 1
    }

    pub fn len(&self) -> usize {
        self.revealed.len()
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.get(index).copied().unwrap_or(false)
    }

    /// Feeds one intersection reading. Returns `true` only for the reading
    /// that flips the element to revealed.
    pub fn sight(&mut self, index: usize, intersecting: bool) -> bool {
        match self.revealed.get_mut(index) {
            Some(revealed) if intersecting && !*revealed => {
                *revealed = true;
                true
            }
            _ => false,
        }
    }
}

/// Staggered transition for the element at `index` in match order.
pub fn transition_for(index: usize, stagger_secs: f64) -> String {
    let delay = index as f64 * stagger_secs;
    format!(
        "opacity 0.6s ease-out {delay}s, transform 0.6s ease-out {delay}s",
        delay = (delay * 1000.0).round() / 1000.0
    )
}

pub fn init(document: &Document, settings: &RevealSettings) -> Result<(), JsValue> {
    let selector = settings.selectors.join(", ");
    let elements: Vec<HtmlElement> = if selector.is_empty() {
        Vec::new()
    } else {
        dom::select_all(document, &selector)
            .into_iter()
            .filter_map(|e| e.dyn_into::<HtmlElement>().ok())
            .collect()
    };
    if elements.is_empty() {
        debug!("no reveal targets on this page");
        return Ok(());
    }

    let board = Rc::new(RefCell::new(RevealBoard::default()));
    let watcher_board = board.clone();
    let watcher = VisibilityWatcher::new(
        settings.threshold,
        Some(settings.root_margin.as_str()),
        move |batch, observer| {
            let mut board = watcher_board.borrow_mut();
            for sighting in batch {
                let Some(index) = sighting
                    .target
                    .get_attribute(INDEX_ATTR)
                    .and_then(|i| i.parse::<usize>().ok())
                else {
                    continue;
                };
                if board.sight(index, sighting.intersecting) {
                    let _ = sighting.target.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(&sighting.target);
                }
            }
        },
    )?;

    for element in &elements {
        let index = board.borrow_mut().register();
        let transition = transition_for(index, settings.stagger_secs);
        element.set_attribute(INDEX_ATTR, &index.to_string())?;
        dom::set_styles(
            element,
            &[
                ("opacity", "0"),
                ("transform", "translateY(30px)"),
                ("transition", transition.as_str()),
            ],
        )?;
        watcher.observe(element);
    }

    dom::inject_style(document, VISIBLE_CSS, None)?;
    debug!("watching {} reveal target(s)", board.borrow().len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revealed_flag_never_reverts() {
        let mut board = RevealBoard::default();
        let card = board.register();

        assert!(!board.sight(card, false));
        assert!(!board.is_revealed(card));

        assert!(board.sight(card, true));
        assert!(board.is_revealed(card));

        assert!(!board.sight(card, false));
        assert!(!board.sight(card, true));
        assert!(board.is_revealed(card));
    }

    #[test]
    fn elements_reveal_independently() {
        let mut board = RevealBoard::default();
        let first = board.register();
        let second = board.register();

        board.sight(second, true);
        assert!(!board.is_revealed(first));
        assert!(board.is_revealed(second));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let mut board = RevealBoard::default();
        assert!(!board.sight(3, true));
        assert!(!board.is_revealed(3));
    }

    #[test]
    fn transition_delay_grows_with_index() {
        assert_eq!(
            transition_for(0, 0.1),
            "opacity 0.6s ease-out 0s, transform 0.6s ease-out 0s"
        );
        assert_eq!(
            transition_for(3, 0.1),
            "opacity 0.6s ease-out 0.3s, transform 0.6s ease-out 0.3s"
        );
    }
}
