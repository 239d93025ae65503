use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, MouseEvent, Node};
use yew::prelude::*;

const OVERLAY_CSS: &str = "position: fixed; top: 0; left: 0; right: 0; bottom: 0; \
    background: rgba(0,0,0,0.8); z-index: 9999; display: flex; align-items: center; \
    justify-content: center; padding: 20px; animation: fadeIn 0.3s ease-out;";
const CONTENT_CSS: &str = "background: white; padding: 40px; border-radius: 12px; \
    max-width: 600px; max-height: 80vh; overflow-y: auto; animation: slideUp 0.3s ease-out;";
const CLOSE_CSS: &str = "margin-top: 20px; padding: 12px 24px; background: var(--color-primary); \
    color: white; border: none; border-radius: 25px; cursor: pointer; font-weight: 600;";
const KEYFRAMES: &str = r#"
    @keyframes fadeIn {
        from { opacity: 0; }
        to { opacity: 1; }
    }
    @keyframes slideUp {
        from { transform: translateY(30px); opacity: 0; }
        to { transform: translateY(0); opacity: 1; }
    }
"#;

/// Links that open the notice instead of navigating.
pub fn is_privacy_anchor(href: &str) -> bool {
    href == "#privacy" || href == "#privacy-policy"
}

fn clicked_privacy_link(e: &MouseEvent) -> bool {
    e.target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|t| t.closest("a[href*=\"privacy\"]").ok().flatten())
        .and_then(|a| a.get_attribute("href"))
        .map_or(false, |href| is_privacy_anchor(&href))
}

#[function_component(PrivacyNotice)]
pub fn privacy_notice() -> Html {
    let open = use_state_eq(|| false);
    let overlay = use_node_ref();

    {
        let open = open.clone();
        use_effect_with_deps(
            move |_| {
                let document = web_sys::window().and_then(|w| w.document());
                let callback = Closure::wrap(Box::new(move |e: MouseEvent| {
                    if clicked_privacy_link(&e) {
                        e.prevent_default();
                        open.set(true);
                    }
                }) as Box<dyn FnMut(MouseEvent)>);
                if let Some(document) = &document {
                    let _ = document
                        .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
                }
                move || {
                    if let Some(document) = document {
                        let _ = document.remove_event_listener_with_callback(
                            "click",
                            callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    let close = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(false))
    };

    let close_on_backdrop = {
        let open = open.clone();
        let overlay = overlay.clone();
        Callback::from(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if target.is_some() && target == overlay.get() {
                open.set(false);
            }
        })
    };

    if !*open {
        return html! {};
    }

    html! {
        <div ref={overlay} class="privacy-overlay" style={OVERLAY_CSS} onclick={close_on_backdrop}>
            <style>{KEYFRAMES}</style>
            <div style={CONTENT_CSS} role="dialog" aria-modal="true">
                <h2 style="margin-bottom: 20px;">{"Datenschutzerklärung"}</h2>
                <p>{"Ihre Daten werden vertraulich behandelt und nicht an Dritte weitergegeben."}</p>
                <button style={CLOSE_CSS} onclick={close}>{"Schließen"}</button>
            </div>
        </div>
    }
}

pub fn mount(document: &Document) -> Result<(), JsValue> {
    let Some(body) = document.body() else {
        return Ok(());
    };
    let host = document.create_element("div")?;
    host.set_class_name("privacy-notice-host");
    body.append_child(&host)?;
    yew::Renderer::<PrivacyNotice>::with_root(host).render();
    debug!("privacy notice mounted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exact_privacy_anchors_open_the_notice() {
        assert!(is_privacy_anchor("#privacy"));
        assert!(is_privacy_anchor("#privacy-policy"));
        assert!(!is_privacy_anchor("/privacy.html"));
        assert!(!is_privacy_anchor("#privacy-settings"));
        assert!(!is_privacy_anchor("#Privacy"));
    }
}
