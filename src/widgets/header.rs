use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Event};

use crate::config::ChromeSettings;
use crate::dom;
use crate::scheduling::{BrowserTimer, Throttle};

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

pub fn init(document: &Document, settings: &ChromeSettings) -> Result<(), JsValue> {
    let Some(navbar) = dom::select(document, ".navbar") else {
        debug!("no navbar, header shrink off");
        return Ok(());
    };
    let Some(window) = web_sys::window() else {
        return Ok(());
    };

    let threshold = settings.header_shrink_after;
    let mut throttle = Throttle::new(BrowserTimer, settings.scroll_throttle_ms);
    dom::listen_passive(&window, "scroll", move |_: Event| {
        throttle.call(|| {
            let classes = navbar.class_list();
            let _ = if is_scrolled(dom::scroll_y(), threshold) {
                classes.add_1("is-scrolled")
            } else {
                classes.remove_1("is-scrolled")
            };
        });
    })?;
    debug!("header shrink wired");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinks_strictly_past_the_threshold() {
        assert!(!is_scrolled(0.0, 50.0));
        assert!(!is_scrolled(50.0, 50.0));
        assert!(is_scrolled(50.5, 50.0));
    }
}
