use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, EventTarget, HtmlElement, NodeList};

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// All matches in document order. An invalid selector counts as no match.
pub fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn select_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn select(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Attaches `handler` for the rest of the page's life.
pub fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Like [`listen`], registered as a passive listener.
pub fn listen_passive<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

/// Appends a `<style>` block to `<head>`. With a `marker`, the block is
/// tagged `data-<marker>` and only injected once per document.
pub fn inject_style(document: &Document, css: &str, marker: Option<&str>) -> Result<(), JsValue> {
    if let Some(marker) = marker {
        if select(document, &format!("style[data-{}]", marker)).is_some() {
            return Ok(());
        }
    }
    let Some(head) = document.head() else {
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_text_content(Some(css));
    if let Some(marker) = marker {
        style.set_attribute(&format!("data-{}", marker), "true")?;
    }
    head.append_child(&style)?;
    Ok(())
}

pub fn set_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// Offset height of the site header, 80 when the page has none.
pub fn header_height(document: &Document) -> f64 {
    select(document, ".navbar, .l-header")
        .and_then(|header| header.dyn_into::<HtmlElement>().ok())
        .map(|header| header.offset_height() as f64)
        .unwrap_or(80.0)
}

pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}
