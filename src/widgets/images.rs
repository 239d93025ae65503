use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlImageElement};

use crate::dom;

const FALLBACK_ATTR: &str = "data-fallback-applied";
const PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 300\"%3E%3Crect fill=\"%23e9ecef\" width=\"400\" height=\"300\"/%3E%3Ctext x=\"50%25\" y=\"50%25\" text-anchor=\"middle\" dy=\".3em\" fill=\"%236c757d\" font-family=\"sans-serif\" font-size=\"18\"%3EImage not available%3C/text%3E%3C/svg%3E";

pub fn init(document: &Document) -> Result<(), JsValue> {
    let images = dom::select_all(document, "img");
    for image in &images {
        if !image.has_attribute("loading") {
            image.set_attribute("loading", "lazy")?;
        }
        let Some(img) = image.dyn_ref::<HtmlImageElement>().cloned() else {
            continue;
        };
        dom::listen(image, "error", move |_: Event| {
            if img.has_attribute(FALLBACK_ATTR) {
                return;
            }
            let _ = img.set_attribute(FALLBACK_ATTR, "true");
            img.set_src(PLACEHOLDER);
        })?;
    }

    for video in dom::select_all(document, "video") {
        if !video.has_attribute("loading") {
            video.set_attribute("loading", "lazy")?;
        }
    }
    debug!("lazy loading on {} image(s)", images.len());
    Ok(())
}
