use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition,
};

use super::controller::{FormController, FormView, SubmitOutcome};
use super::model::{Field, Form};
use super::validators::FieldValue;
use crate::config::FormSettings;
use crate::dom;
use crate::scheduling::{BrowserTimer, Debouncer};

const SPINNER: &str = "<span style=\"display:inline-block;width:16px;height:16px;border:2px solid #fff;border-top-color:transparent;border-radius:50%;animation:spin 0.6s linear infinite;margin-right:8px;\"></span>";
const SPIN_KEYFRAMES: &str = "@keyframes spin { to { transform: rotate(360deg); } }";

/// A `<form>` as the controller sees it.
pub struct DomForm {
    document: Document,
    fields: Vec<Element>,
    submit: Option<HtmlButtonElement>,
}

fn field_key(field: &Element) -> String {
    field
        .get_attribute("name")
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| field.id())
}

fn is_required(field: &Element) -> bool {
    field.has_attribute("required")
        || field
            .get_attribute("aria-required")
            .map_or(false, |v| v != "false")
}

fn read_value(field: &Element) -> FieldValue {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        if input.type_() == "checkbox" {
            return FieldValue::Checked(input.checked());
        }
        return FieldValue::Text(input.value());
    }
    if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
        return FieldValue::Text(select.value());
    }
    if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        return FieldValue::Text(area.value());
    }
    FieldValue::Text(String::new())
}

impl DomForm {
    pub fn new(document: Document, form: &Element) -> Self {
        let submit = form
            .query_selector("button[type=\"submit\"]")
            .ok()
            .flatten()
            .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok());
        Self {
            document,
            fields: dom::select_all_in(form, "input, select, textarea"),
            submit,
        }
    }

    pub fn model(&self) -> Form {
        Form::new(
            self.fields
                .iter()
                .map(|f| Field::new(field_key(f), read_value(f), is_required(f)))
                .collect(),
        )
    }

    pub fn field(&self, index: usize) -> Option<&Element> {
        self.fields.get(index)
    }

    /// The field's feedback element, created next to it on first use.
    fn error_element(&self, field: &Element) -> Result<Option<HtmlElement>, JsValue> {
        let Some(parent) = field.parent_element() else {
            return Ok(None);
        };
        let existing = parent.query_selector(".invalid-feedback, .c-form__error")?;
        let error = match existing {
            Some(error) => error,
            None => {
                let error = self.document.create_element("div")?;
                let class = if field.class_list().contains("c-form__input") {
                    "c-form__error"
                } else {
                    "invalid-feedback"
                };
                error.set_class_name(class);
                parent.append_child(&error)?;
                error
            }
        };
        Ok(error.dyn_into::<HtmlElement>().ok())
    }

    fn mark(&self, index: usize, message: Option<&str>) -> Result<(), JsValue> {
        let Some(field) = self.fields.get(index) else {
            return Ok(());
        };
        let error = self.error_element(field)?;
        let in_field_group = field
            .parent_element()
            .filter(|p| p.class_list().contains("c-form__field"));

        match message {
            Some(message) => {
                field.set_attribute("aria-invalid", "true")?;
                field.class_list().add_1("is-invalid")?;
                if let Some(group) = in_field_group {
                    group.class_list().add_1("has-error")?;
                }
                if let Some(error) = error {
                    error.set_text_content(Some(message));
                    error.style().set_property("display", "block")?;
                }
            }
            None => {
                field.remove_attribute("aria-invalid")?;
                field.class_list().remove_1("is-invalid")?;
                if let Some(group) = in_field_group {
                    group.class_list().remove_1("has-error")?;
                }
                if let Some(error) = error {
                    error.style().set_property("display", "none")?;
                }
            }
        }
        Ok(())
    }

    fn try_lock(&self, busy_label: &str) -> Result<(), JsValue> {
        let Some(button) = &self.submit else {
            debug!("form has no submit button to lock");
            return Ok(());
        };
        button.set_disabled(true);
        button.set_inner_html(&format!("{}{}", SPINNER, busy_label));
        dom::inject_style(&self.document, SPIN_KEYFRAMES, Some("spin"))
    }
}

impl FormView for DomForm {
    fn read(&self, index: usize) -> FieldValue {
        self.fields
            .get(index)
            .map(read_value)
            .unwrap_or(FieldValue::Text(String::new()))
    }

    fn show_error(&self, index: usize, message: &str) {
        if let Err(e) = self.mark(index, Some(message)) {
            warn!("could not show field error: {:?}", e);
        }
    }

    fn clear_error(&self, index: usize) {
        if let Err(e) = self.mark(index, None) {
            warn!("could not clear field error: {:?}", e);
        }
    }

    fn focus_and_reveal(&self, index: usize) {
        let Some(field) = self.fields.get(index).and_then(|f| f.dyn_ref::<HtmlElement>()) else {
            return;
        };
        let _ = field.focus();
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        field.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn lock_submit(&self, busy_label: &str) {
        if let Err(e) = self.try_lock(busy_label) {
            warn!("could not lock submit button: {:?}", e);
        }
    }

    fn navigate(&self, target: &str) {
        info!("Redirecting to {}", target);
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(target) {
                warn!("redirect failed: {:?}", e);
            }
        }
    }
}

type Controller = Rc<RefCell<FormController<DomForm, BrowserTimer>>>;

fn wire_form(document: &Document, form: &Element, settings: &FormSettings) -> Result<(), JsValue> {
    let view = Rc::new(DomForm::new(document.clone(), form));
    let model = view.model();
    let required: Vec<usize> = model.required_indices().collect();
    let controller: Controller = Rc::new(RefCell::new(FormController::new(
        model,
        view.clone(),
        BrowserTimer,
        settings.clone(),
    )));

    for index in required {
        let Some(field) = view.field(index) else {
            continue;
        };

        // Focusing the first invalid field during submit fires `blur`
        // synchronously; the controller is still borrowed then and the
        // submit pass has validated everything anyway.
        let on_blur = controller.clone();
        dom::listen(field, "blur", move |_: Event| {
            if let Ok(mut controller) = on_blur.try_borrow_mut() {
                controller.validate(index);
            }
        })?;

        let on_input = controller.clone();
        let debouncer = Rc::new(RefCell::new(Debouncer::new(BrowserTimer, settings.debounce_ms)));
        dom::listen(field, "input", move |_: Event| {
            let controller = on_input.clone();
            debouncer.borrow_mut().call(move || {
                if let Ok(mut controller) = controller.try_borrow_mut() {
                    controller.validate(index);
                }
            });
        })?;
    }

    let on_submit = controller;
    dom::listen(form, "submit", move |e: Event| {
        e.prevent_default();
        e.stop_propagation();
        let outcome = on_submit.borrow_mut().submit();
        match outcome {
            SubmitOutcome::Blocked { first_invalid } => {
                debug!("submit blocked, first invalid field #{}", first_invalid)
            }
            SubmitOutcome::Accepted => info!("Form validated, submitting"),
            SubmitOutcome::Ignored => debug!("submit already in progress"),
        }
    })?;
    Ok(())
}

pub fn init(document: &Document, settings: &FormSettings) -> Result<(), JsValue> {
    let forms = dom::select_all(document, "form");
    if forms.is_empty() {
        debug!("no forms on this page");
        return Ok(());
    }
    for form in &forms {
        wire_form(document, form, settings)?;
    }
    debug!("wired {} form(s)", forms.len());
    Ok(())
}
