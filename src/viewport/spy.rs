use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::observer::VisibilityWatcher;
use crate::config::{SpySettings, SpyStrategy};
use crate::dom;

/// A section's reading from one intersection batch. `order` is the
/// section's position in the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionSighting {
    pub order: usize,
    pub intersecting: bool,
    pub ratio: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpyUpdate {
    Highlight(usize),
    Clear,
}

/// Decides which section's links are highlighted.
#[derive(Debug)]
pub struct ScrollSpy {
    strategy: SpyStrategy,
    // Currently intersecting sections by document order, with their ratio.
    live: BTreeMap<usize, f64>,
    active: Option<usize>,
}

impl ScrollSpy {
    pub fn new(strategy: SpyStrategy) -> Self {
        Self {
            strategy,
            live: BTreeMap::new(),
            active: None,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Applies one callback batch and reports whether the highlight has to
    /// change.
    pub fn apply(&mut self, batch: &[SectionSighting]) -> Option<SpyUpdate> {
        for sighting in batch {
            if sighting.intersecting {
                self.live.insert(sighting.order, sighting.ratio);
            } else {
                self.live.remove(&sighting.order);
            }
        }

        let next = match self.strategy {
            SpyStrategy::LastWins => {
                match batch.iter().rev().find(|s| s.intersecting) {
                    Some(last) => Some(last.order),
                    // Nothing entered in this batch: keep whatever was marked.
                    None => return None,
                }
            }
            SpyStrategy::Ranked => self.most_visible(),
        };

        if next == self.active {
            return None;
        }
        self.active = next;
        Some(next.map_or(SpyUpdate::Clear, SpyUpdate::Highlight))
    }

    fn most_visible(&self) -> Option<usize> {
        // Ascending order, so on equal ratios the first section seen stays.
        self.live
            .iter()
            .fold(None, |best: Option<(usize, f64)>, (&order, &ratio)| match best {
                Some((_, best_ratio)) if best_ratio >= ratio => best,
                _ => Some((order, ratio)),
            })
            .map(|(order, _)| order)
    }
}

/// Whether a nav link's `href` points at the section `id`, as `#id` or `/#id`.
pub fn targets_section(href: &str, id: &str) -> bool {
    href.strip_prefix('#')
        .or_else(|| href.strip_prefix("/#"))
        .map_or(false, |target| target == id)
}

fn highlight(links: &[Element], section_id: Option<&str>) {
    for link in links {
        let href = link.get_attribute("href").unwrap_or_default();
        let on = section_id.map_or(false, |id| targets_section(&href, id));
        if on {
            let _ = link.class_list().add_1("active");
            let _ = link.set_attribute("aria-current", "page");
        } else {
            let _ = link.class_list().remove_1("active");
            let _ = link.remove_attribute("aria-current");
        }
    }
}

pub fn init(document: &Document, settings: &SpySettings) -> Result<(), JsValue> {
    let sections = dom::select_all(document, "section[id]");
    if sections.is_empty() {
        debug!("no sections with ids, scroll-spy off");
        return Ok(());
    }

    let ids: Vec<String> = sections.iter().map(|s| s.id()).collect();
    let spy = Rc::new(RefCell::new(ScrollSpy::new(settings.strategy)));
    let doc = document.clone();
    let section_ids = ids.clone();

    let watcher = VisibilityWatcher::new(settings.threshold, None, move |batch, _| {
        let readings: Vec<SectionSighting> = batch
            .iter()
            .filter_map(|s| {
                let order = section_ids.iter().position(|id| *id == s.target.id())?;
                Some(SectionSighting {
                    order,
                    intersecting: s.intersecting,
                    ratio: s.ratio,
                })
            })
            .collect();

        let update = spy.borrow_mut().apply(&readings);
        if let Some(update) = update {
            let links = dom::select_all(&doc, ".nav-link");
            match update {
                SpyUpdate::Highlight(order) => {
                    debug!("scroll-spy: #{}", section_ids[order]);
                    highlight(&links, Some(section_ids[order].as_str()));
                }
                SpyUpdate::Clear => highlight(&links, None),
            }
        }
    })?;

    for section in &sections {
        watcher.observe(section);
    }
    debug!("scroll-spy watching {} section(s)", ids.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seen(order: usize, ratio: f64) -> SectionSighting {
        SectionSighting {
            order,
            intersecting: true,
            ratio,
        }
    }

    fn gone(order: usize) -> SectionSighting {
        SectionSighting {
            order,
            intersecting: false,
            ratio: 0.0,
        }
    }

    #[test]
    fn ranked_picks_highest_ratio_regardless_of_batch_order() {
        let mut spy = ScrollSpy::new(SpyStrategy::Ranked);
        assert_eq!(
            spy.apply(&[seen(2, 0.9), seen(1, 0.6)]),
            Some(SpyUpdate::Highlight(2))
        );
        assert_eq!(spy.apply(&[seen(1, 0.6), seen(2, 0.9)]), None);
        assert_eq!(spy.active(), Some(2));
    }

    #[test]
    fn ranked_breaks_ties_by_document_order() {
        let mut spy = ScrollSpy::new(SpyStrategy::Ranked);
        assert_eq!(
            spy.apply(&[seen(3, 0.5), seen(1, 0.5)]),
            Some(SpyUpdate::Highlight(1))
        );
    }

    #[test]
    fn ranked_falls_back_when_the_leader_leaves_and_clears_when_empty() {
        let mut spy = ScrollSpy::new(SpyStrategy::Ranked);
        spy.apply(&[seen(0, 0.7), seen(1, 0.9)]);

        assert_eq!(spy.apply(&[gone(1)]), Some(SpyUpdate::Highlight(0)));
        assert_eq!(spy.apply(&[gone(0)]), Some(SpyUpdate::Clear));
        assert_eq!(spy.active(), None);
        assert_eq!(spy.apply(&[gone(0)]), None);
    }

    #[test]
    fn ranked_tracks_sections_across_batches() {
        let mut spy = ScrollSpy::new(SpyStrategy::Ranked);
        spy.apply(&[seen(0, 0.6)]);
        assert_eq!(spy.apply(&[seen(1, 0.8)]), Some(SpyUpdate::Highlight(1)));
        assert_eq!(spy.apply(&[seen(0, 1.0)]), Some(SpyUpdate::Highlight(0)));
    }

    #[test]
    fn last_wins_takes_the_final_intersecting_entry() {
        let mut spy = ScrollSpy::new(SpyStrategy::LastWins);
        assert_eq!(
            spy.apply(&[seen(2, 0.9), seen(1, 0.6), gone(0)]),
            Some(SpyUpdate::Highlight(1))
        );
        // Exits alone never change the highlight.
        assert_eq!(spy.apply(&[gone(1)]), None);
        assert_eq!(spy.active(), Some(1));
    }

    #[test]
    fn href_matching() {
        assert!(targets_section("#contact", "contact"));
        assert!(targets_section("/#contact", "contact"));
        assert!(!targets_section("/contact", "contact"));
        assert!(!targets_section("#contact-form", "contact"));
        assert!(!targets_section("/index.html#contact", "contact"));
    }
}
