use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Document;

mod config;
mod dom;
mod guard;
mod scheduling;
mod forms {
    pub mod binding;
    pub mod controller;
    pub mod model;
    pub mod validators;
}
mod viewport {
    pub mod active_link;
    pub mod counter;
    pub mod observer;
    pub mod reveal;
    pub mod spy;
}
mod widgets {
    pub mod accordion;
    pub mod header;
    pub mod hover;
    pub mod images;
    pub mod menu;
    pub mod privacy;
    pub mod ripple;
    pub mod scroll_top;
    pub mod smooth_scroll;
}

use config::Settings;
use guard::{Initializer, Subsystem};

fn setup(document: &Document, settings: &Settings, subsystem: Subsystem) -> Result<(), JsValue> {
    match subsystem {
        Subsystem::Menu => widgets::menu::init(document, &settings.chrome),
        Subsystem::Reveal => viewport::reveal::init(document, &settings.reveal),
        Subsystem::Ripple => widgets::ripple::init(document),
        Subsystem::Counters => viewport::counter::init(document, &settings.counters),
        Subsystem::SmoothScroll => widgets::smooth_scroll::init(document),
        Subsystem::ActiveLink => viewport::active_link::init(document),
        Subsystem::ScrollSpy => viewport::spy::init(document, &settings.scroll_spy),
        Subsystem::Images => widgets::images::init(document),
        Subsystem::Forms => forms::binding::init(document, &settings.forms),
        Subsystem::ScrollToTop => widgets::scroll_top::mount(document, &settings.chrome),
        Subsystem::Header => widgets::header::init(document, &settings.chrome),
        Subsystem::Hover => widgets::hover::init(document),
        Subsystem::Accordion => widgets::accordion::init(document),
        Subsystem::Privacy => widgets::privacy::mount(document),
    }
}

/// Wires every subsystem that hasn't been wired yet. Safe to call again.
pub fn init_page(initializer: &mut Initializer, settings: &Settings) {
    let Some(document) = dom::document() else {
        warn!("no document, nothing to wire");
        return;
    };
    for subsystem in Subsystem::ALL {
        if !initializer.claim(subsystem) {
            debug!("{} already wired", subsystem.name());
            continue;
        }
        if let Err(e) = setup(&document, settings, subsystem) {
            warn!("{} setup failed: {:?}", subsystem.name(), e);
        }
    }
    info!("Page wired");
}

fn load_settings() -> Settings {
    match Settings::from_document(dom::document().as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{}, using default settings", e);
            Settings::default()
        }
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site controller");
    let mut initializer = Initializer::default();

    let Some(document) = dom::document() else {
        warn!("no document, nothing to wire");
        return;
    };
    if document.ready_state() != "loading" {
        init_page(&mut initializer, &load_settings());
        return;
    }

    let on_ready = Closure::once(move || init_page(&mut initializer, &load_settings()));
    if let Err(e) = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        warn!("could not wait for DOMContentLoaded: {:?}", e);
        return;
    }
    on_ready.forget();
}
