use log::debug;
use wasm_bindgen::JsValue;
use web_sys::Document;

use crate::dom;

fn is_root(path: &str) -> bool {
    path == "/" || path.ends_with("/index.html") || path.ends_with("/index.htm")
}

/// Whether a link with `href` belongs to the page at `path`. The fragment
/// is ignored; `/` and `/index.html` count as the same page.
pub fn is_current(path: &str, href: &str) -> bool {
    let link_path = href.split('#').next().unwrap_or_default();
    if link_path == path {
        return true;
    }
    is_root(path) && (link_path == "/" || link_path == "/index.html")
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(());
    };
    let path = window.location().pathname()?;
    let mut marked = 0;
    for link in dom::select_all(document, ".nav-link") {
        let href = link.get_attribute("href").unwrap_or_default();
        link.remove_attribute("aria-current")?;
        link.class_list().remove_1("active")?;
        if is_current(&path, &href) {
            link.set_attribute("aria-current", "page")?;
            link.class_list().add_1("active")?;
            marked += 1;
        }
    }
    debug!("{} nav link(s) active for {}", marked, path);
    Ok(())
}
