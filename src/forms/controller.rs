use std::cell::Cell;
use std::rc::Rc;

use log::debug;

use super::model::{Form, Validity};
use super::validators::FieldValue;
use crate::config::FormSettings;
use crate::scheduling::Timer;

/// Everything the submission flow needs from the page. Field indices are
/// positions in the [`Form`] the controller was built with.
pub trait FormView {
    fn read(&self, index: usize) -> FieldValue;
    fn show_error(&self, index: usize, message: &str);
    fn clear_error(&self, index: usize);
    fn focus_and_reveal(&self, index: usize);
    /// Disables the submit control and swaps in the busy label.
    fn lock_submit(&self, busy_label: &str);
    fn navigate(&self, target: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitPhase {
    Ready,
    Validating,
    Submitting,
    Redirecting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the form is back in `Ready`.
    Blocked { first_invalid: usize },
    /// Validation passed and the redirect is scheduled.
    Accepted,
    /// A submission is already under way.
    Ignored,
}

pub struct FormController<V: FormView + 'static, T: Timer> {
    form: Form,
    view: Rc<V>,
    timer: T,
    settings: FormSettings,
    phase: Rc<Cell<SubmitPhase>>,
    redirect: Option<T::Handle>,
}

impl<V: FormView + 'static, T: Timer> FormController<V, T> {
    pub fn new(form: Form, view: Rc<V>, timer: T, settings: FormSettings) -> Self {
        Self {
            form,
            view,
            timer,
            settings,
            phase: Rc::new(Cell::new(SubmitPhase::Ready)),
            redirect: None,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase.get()
    }

    pub fn redirect_scheduled(&self) -> bool {
        self.redirect.is_some()
    }

    /// Re-reads one field from the page, validates it and shows or hides
    /// its error.
    pub fn validate(&mut self, index: usize) -> bool {
        let value = self.view.read(index);
        self.form.set_value(index, value);
        let valid = self.form.validate_field(index);
        self.render(index);
        valid
    }

    fn render(&self, index: usize) {
        match self.form.field(index).map(|f| f.validity()) {
            Some(Validity::Invalid(message)) => self.view.show_error(index, message),
            Some(_) => self.view.clear_error(index),
            None => {}
        }
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.phase.get() != SubmitPhase::Ready {
            debug!("submit ignored in {:?}", self.phase.get());
            return SubmitOutcome::Ignored;
        }
        self.phase.set(SubmitPhase::Validating);

        let required: Vec<usize> = self.form.required_indices().collect();
        for &index in &required {
            let value = self.view.read(index);
            self.form.set_value(index, value);
        }
        let first_invalid = self.form.validate_required();
        for &index in &required {
            self.render(index);
        }

        if let Some(first_invalid) = first_invalid {
            self.phase.set(SubmitPhase::Ready);
            self.view.focus_and_reveal(first_invalid);
            return SubmitOutcome::Blocked { first_invalid };
        }

        self.phase.set(SubmitPhase::Submitting);
        self.view.lock_submit(&self.settings.busy_label);

        let view = self.view.clone();
        let phase = self.phase.clone();
        let target = self.settings.redirect_to.clone();
        self.redirect = Some(self.timer.after(
            self.settings.submit_delay_ms,
            Box::new(move || {
                phase.set(SubmitPhase::Redirecting);
                view.navigate(&target);
            }),
        ));
        SubmitOutcome::Accepted
    }
}
