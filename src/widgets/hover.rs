use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Event, HtmlElement};

use crate::dom;

const CARDS: &str = ".benefit-card, .category-card, .card, .c-service-card, .c-location-card";

pub fn init(document: &Document) -> Result<(), JsValue> {
    let cards = dom::select_all(document, CARDS);
    for card in &cards {
        let Some(host) = card.dyn_ref::<HtmlElement>().cloned() else {
            continue;
        };
        dom::listen(card, "mouseenter", move |_: Event| {
            let _ = host
                .style()
                .set_property("transition", "transform 0.3s ease-out, box-shadow 0.3s ease-out");
        })?;
    }
    debug!("hover transitions on {} card(s)", cards.len());
    Ok(())
}
