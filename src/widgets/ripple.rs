use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, MouseEvent};

use crate::dom;

const RIPPLE_CLASS: &str = "ripple-effect";
const RIPPLE_MS: u32 = 600;
const KEYFRAMES: &str = r#"
      @keyframes ripple-animation {
        to {
          width: 300px;
          height: 300px;
          opacity: 0;
        }
      }
"#;

fn ripple_css(x: f64, y: f64) -> String {
    format!(
        "position: absolute; left: {x}px; top: {y}px; width: 0; height: 0; \
         border-radius: 50%; background: rgba(255, 255, 255, 0.6); \
         transform: translate(-50%, -50%); animation: ripple-animation 0.6s ease-out; \
         pointer-events: none;"
    )
}

fn spawn(document: &Document, host: &HtmlElement, e: &MouseEvent) -> Result<(), JsValue> {
    let rect = host.get_bounding_client_rect();
    let x = e.client_x() as f64 - rect.left();
    let y = e.client_y() as f64 - rect.top();

    if let Some(old) = host.query_selector(&format!(".{}", RIPPLE_CLASS))? {
        old.remove();
    }
    let ripple = document.create_element("span")?;
    ripple.set_attribute("style", &ripple_css(x, y))?;
    ripple.class_list().add_1(RIPPLE_CLASS)?;
    dom::set_styles(host, &[("position", "relative"), ("overflow", "hidden")])?;
    host.append_child(&ripple)?;

    Timeout::new(RIPPLE_MS, move || ripple.remove()).forget();
    Ok(())
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let buttons = dom::select_all(document, ".btn, .c-button, .nav-link, a[class*=\"btn\"]");
    for button in &buttons {
        let Some(host) = button.dyn_ref::<HtmlElement>().cloned() else {
            continue;
        };
        let doc = document.clone();
        dom::listen(button, "click", move |e: MouseEvent| {
            let _ = spawn(&doc, &host, &e);
        })?;
    }
    dom::inject_style(document, KEYFRAMES, None)?;
    debug!("ripple on {} control(s)", buttons.len());
    Ok(())
}
