use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// One entry of an intersection callback batch.
pub struct Sighting {
    pub target: Element,
    pub intersecting: bool,
    pub ratio: f64,
}

/// An `IntersectionObserver` that lives as long as the page.
pub struct VisibilityWatcher {
    observer: IntersectionObserver,
}

impl VisibilityWatcher {
    pub fn new(
        threshold: f64,
        root_margin: Option<&str>,
        mut on_batch: impl FnMut(Vec<Sighting>, &IntersectionObserver) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
            let batch = entries
                .iter()
                .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| Sighting {
                    target: entry.target(),
                    intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                })
                .collect();
            on_batch(batch, &observer);
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            init.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        callback.forget();
        Ok(Self { observer })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}
