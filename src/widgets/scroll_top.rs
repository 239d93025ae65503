use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, MouseEvent, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use crate::config::ChromeSettings;
use crate::dom;
use crate::scheduling::{BrowserTimer, Throttle};

const BUTTON_CSS: &str = "position: fixed; bottom: 30px; right: 30px; width: 50px; height: 50px; \
    border-radius: 50%; background: var(--color-primary); color: white; border: none; \
    cursor: pointer; transition: all 0.3s ease; z-index: 999; font-size: 24px; \
    box-shadow: 0 4px 12px rgba(0,0,0,0.15);";

#[derive(Properties, PartialEq)]
pub struct ScrollToTopProps {
    pub show_after: f64,
    pub throttle_ms: u32,
}

#[function_component(ScrollToTop)]
pub fn scroll_to_top(props: &ScrollToTopProps) -> Html {
    let visible = use_state_eq(|| false);

    {
        let visible = visible.clone();
        let show_after = props.show_after;
        let throttle_ms = props.throttle_ms;
        use_effect_with_deps(
            move |_| {
                let destructor: Box<dyn FnOnce()> = if let Some(window) = web_sys::window() {
                    let mut throttle = Throttle::new(BrowserTimer, throttle_ms);
                    let callback = Closure::wrap(Box::new(move || {
                        throttle.call(|| visible.set(dom::scroll_y() > show_after));
                    }) as Box<dyn FnMut()>);
                    let options = AddEventListenerOptions::new();
                    options.set_passive(true);
                    let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                        "scroll",
                        callback.as_ref().unchecked_ref(),
                        &options,
                    );
                    Box::new(move || {
                        let _ = window.remove_event_listener_with_callback(
                            "scroll",
                            callback.as_ref().unchecked_ref(),
                        );
                    })
                } else {
                    Box::new(|| ())
                };
                move || destructor()
            },
            (show_after.to_bits(), throttle_ms),
        );
    }

    let onclick = Callback::from(|_: MouseEvent| {
        if let Some(window) = web_sys::window() {
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        }
    });

    let state_css = if *visible {
        "opacity: 1; visibility: visible;"
    } else {
        "opacity: 0; visibility: hidden;"
    };

    html! {
        <button
            class="scroll-to-top"
            aria-label="Nach oben scrollen"
            style={format!("{} {}", BUTTON_CSS, state_css)}
            {onclick}
        >
            {"↑"}
        </button>
    }
}

pub fn mount(document: &Document, settings: &ChromeSettings) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let host = document.create_element("div")?;
    host.set_class_name("scroll-to-top-host");
    body.append_child(&host)?;

    yew::Renderer::<ScrollToTop>::with_root_and_props(
        host,
        ScrollToTopProps {
            show_after: settings.scroll_top_after,
            throttle_ms: settings.scroll_throttle_ms,
        },
    )
    .render();
    debug!("scroll-to-top mounted");
    Ok(())
}
