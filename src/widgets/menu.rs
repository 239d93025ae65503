use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, KeyboardEvent, MouseEvent, Node};

use crate::config::ChromeSettings;
use crate::dom;
use crate::scheduling::{BrowserTimer, Throttle};

struct Menu {
    document: Document,
    toggle: Element,
    collapse: HtmlElement,
    open: Cell<bool>,
}

impl Menu {
    fn set_open(&self, open: bool) -> Result<(), JsValue> {
        self.open.set(open);
        let body = self.document.body();
        if open {
            self.collapse.class_list().add_1("show")?;
            self.toggle.set_attribute("aria-expanded", "true")?;
            if let Some(body) = body {
                body.class_list().add_1("u-no-scroll")?;
            }
            let height = format!("calc(100vh - {}px)", dom::header_height(&self.document));
            self.collapse.style().set_property("height", &height)?;
        } else {
            self.collapse.class_list().remove_1("show")?;
            self.toggle.set_attribute("aria-expanded", "false")?;
            if let Some(body) = body {
                body.class_list().remove_1("u-no-scroll")?;
            }
            self.collapse.style().remove_property("height")?;
        }
        Ok(())
    }

    fn close(&self) {
        if self.open.get() {
            let _ = self.set_open(false);
        }
    }
}

/// A viewport at least as wide as the breakpoint shows the full nav.
pub fn closes_on_resize(width: f64, breakpoint: f64, open: bool) -> bool {
    open && width >= breakpoint
}

pub fn init(document: &Document, settings: &ChromeSettings) -> Result<(), JsValue> {
    let toggle = dom::select(document, ".navbar-toggler");
    let collapse = dom::select(document, ".navbar-collapse")
        .and_then(|c| c.dyn_into::<HtmlElement>().ok());
    let (Some(toggle), Some(collapse)) = (toggle, collapse) else {
        debug!("no collapsible menu on this page");
        return Ok(());
    };

    let menu = Rc::new(Menu {
        document: document.clone(),
        toggle,
        collapse,
        open: Cell::new(false),
    });

    let on_toggle = menu.clone();
    dom::listen(&menu.toggle, "click", move |e: MouseEvent| {
        e.prevent_default();
        let _ = on_toggle.set_open(!on_toggle.open.get());
    })?;

    let on_key = menu.clone();
    dom::listen(document, "keydown", move |e: KeyboardEvent| {
        if e.key() == "Escape" {
            on_key.close();
        }
    })?;

    let on_outside = menu.clone();
    dom::listen(document, "click", move |e: Event| {
        if !on_outside.open.get() {
            return;
        }
        let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = on_outside.collapse.contains(target.as_ref())
            || on_outside.toggle.contains(target.as_ref());
        if !inside {
            on_outside.close();
        }
    })?;

    for link in dom::select_all(document, ".nav-link") {
        let on_link = menu.clone();
        dom::listen(&link, "click", move |_: Event| on_link.close())?;
    }

    if let Some(window) = web_sys::window() {
        let on_resize = menu;
        let breakpoint = settings.menu_breakpoint;
        let mut throttle = Throttle::new(BrowserTimer, settings.resize_throttle_ms);
        dom::listen_passive(&window, "resize", move |_: Event| {
            throttle.call(|| {
                let width = web_sys::window()
                    .and_then(|w| w.inner_width().ok())
                    .and_then(|w| w.as_f64())
                    .unwrap_or(0.0);
                if closes_on_resize(width, breakpoint, on_resize.open.get()) {
                    on_resize.close();
                }
            });
        })?;
    }
    debug!("menu wired");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_closes_only_an_open_menu_at_desktop_width() {
        assert!(closes_on_resize(1024.0, 768.0, true));
        assert!(closes_on_resize(768.0, 768.0, true));
        assert!(!closes_on_resize(767.0, 768.0, true));
        assert!(!closes_on_resize(1024.0, 768.0, false));
    }
}
