use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, MouseEvent, ScrollBehavior, ScrollToOptions};

use crate::dom;

/// The element id an in-page link scrolls to. `#` and `#!` are
/// placeholders, not targets.
pub fn anchor_target(href: &str) -> Option<&str> {
    if href.is_empty() || href == "#" || href == "#!" {
        return None;
    }
    let hash = match href.split_once("/#") {
        Some((_, after)) => after,
        None => href.strip_prefix('#').unwrap_or(href),
    };
    (!hash.is_empty()).then_some(hash)
}

fn scroll_to_anchor(document: &Document, e: &MouseEvent) -> Result<(), JsValue> {
    let Some(link) = e
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|t| t.closest("a[href^=\"#\"]").ok().flatten())
    else {
        return Ok(());
    };
    let href = link.get_attribute("href").unwrap_or_default();
    let Some(id) = anchor_target(&href) else {
        return Ok(());
    };
    let Some(target) = document.get_element_by_id(id) else {
        return Ok(());
    };
    let Some(window) = web_sys::window() else {
        return Ok(());
    };

    e.prevent_default();
    let top = target.get_bounding_client_rect().top() + window.scroll_y()? - dom::header_height(document);
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);

    window
        .history()?
        .push_state_with_url(&JsValue::NULL, "", Some(&format!("#{}", id)))?;
    Ok(())
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let doc = document.clone();
    dom::listen(document, "click", move |e: MouseEvent| {
        let _ = scroll_to_anchor(&doc, &e);
    })?;
    debug!("smooth scrolling wired");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_hash_links() {
        assert_eq!(anchor_target("#kontakt"), Some("kontakt"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("#!"), None);
        assert_eq!(anchor_target(""), None);
    }

    #[test]
    fn root_hash_links_use_the_part_after_the_slash() {
        assert_eq!(anchor_target("/#leistungen"), Some("leistungen"));
        assert_eq!(anchor_target("#a/#b"), Some("b"));
        assert_eq!(anchor_target("/#"), None);
    }
}
