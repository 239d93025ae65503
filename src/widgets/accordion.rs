use log::debug;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Event};

use crate::dom;

fn toggle(document: &Document, button: &Element) -> Result<(), JsValue> {
    let Some(target) = button.get_attribute("data-bs-target") else {
        return Ok(());
    };
    let Some(panel) = dom::select(document, &target) else {
        return Ok(());
    };

    let expanded = button.get_attribute("aria-expanded").as_deref() == Some("true");
    if expanded {
        button.set_attribute("aria-expanded", "false")?;
        button.class_list().add_1("collapsed")?;
        panel.class_list().remove_1("show")?;
    } else {
        button.set_attribute("aria-expanded", "true")?;
        button.class_list().remove_1("collapsed")?;
        panel.class_list().add_1("show")?;
    }
    Ok(())
}

pub fn init(document: &Document) -> Result<(), JsValue> {
    let buttons = dom::select_all(document, ".accordion-button");
    for button in &buttons {
        let doc = document.clone();
        let this = button.clone();
        dom::listen(button, "click", move |_: Event| {
            let _ = toggle(&doc, &this);
        })?;
    }
    debug!("{} accordion button(s) wired", buttons.len());
    Ok(())
}
