use super::validators::{self, FieldValue};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validity {
    Unvalidated,
    Valid,
    /// Carries the message of the validator that rejected the value.
    Invalid(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Validator key, taken from the element's `name` or `id`.
    pub key: String,
    pub value: FieldValue,
    pub required: bool,
    validity: Validity,
}

impl Field {
    pub fn new(key: impl Into<String>, value: FieldValue, required: bool) -> Self {
        Self {
            key: key.into(),
            value,
            required,
            validity: Validity::Unvalidated,
        }
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn validate(&mut self) -> bool {
        self.validity = match validators::check(&self.key, &self.value) {
            Ok(()) => Validity::Valid,
            Err(message) => Validity::Invalid(message),
        };
        self.validity == Validity::Valid
    }
}

/// The fields of one form in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Form {
    fields: Vec<Field>,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn set_value(&mut self, index: usize, value: FieldValue) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
        }
    }

    /// Fields that don't exist pass.
    pub fn validate_field(&mut self, index: usize) -> bool {
        self.fields.get_mut(index).map_or(true, Field::validate)
    }

    /// Validates every required field, all of them even after the first
    /// failure, and returns the index of the first invalid one.
    pub fn validate_required(&mut self) -> Option<usize> {
        let mut first_invalid = None;
        for (index, field) in self.fields.iter_mut().enumerate() {
            if field.required && !field.validate() && first_invalid.is_none() {
                first_invalid = Some(index);
            }
        }
        first_invalid
    }

    pub fn required_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.required)
            .map(|(i, _)| i)
    }

    pub fn is_submittable(&self) -> bool {
        self.fields
            .iter()
            .filter(|f| f.required)
            .all(|f| f.validity == Validity::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(key: &str, value: &str) -> Field {
        Field::new(key, FieldValue::Text(value.to_string()), true)
    }

    #[test]
    fn fields_start_unvalidated() {
        let form = Form::new(vec![text("name", "Jo")]);
        assert_eq!(form.fields()[0].validity(), Validity::Unvalidated);
        assert!(!form.is_submittable());
    }

    #[test]
    fn validity_follows_the_latest_value() {
        let mut form = Form::new(vec![text("email", "bad")]);
        assert!(!form.validate_field(0));
        assert_eq!(
            form.fields()[0].validity(),
            Validity::Invalid("Bitte geben Sie eine gültige E-Mail-Adresse ein")
        );

        form.set_value(0, FieldValue::Text("a@b.co".to_string()));
        assert!(form.validate_field(0));
        assert_eq!(form.fields()[0].validity(), Validity::Valid);
    }

    #[test]
    fn first_invalid_is_in_document_order_and_all_are_checked() {
        let mut form = Form::new(vec![
            text("name", "Jo"),
            text("email", "bad"),
            text("message", "short"),
        ]);

        assert_eq!(form.validate_required(), Some(1));
        assert_eq!(form.fields()[2].validity(), Validity::Invalid(
            "Bitte geben Sie eine Nachricht mit mindestens 10 Zeichen ein"
        ));
        assert!(!form.is_submittable());
    }

    #[test]
    fn optional_fields_do_not_gate_submission() {
        let mut form = Form::new(vec![
            text("name", "Jo"),
            Field::new("phone", FieldValue::Text("nope".to_string()), false),
        ]);

        assert_eq!(form.validate_required(), None);
        assert_eq!(form.fields()[1].validity(), Validity::Unvalidated);
        assert!(form.is_submittable());
        assert_eq!(form.required_indices().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn unregistered_required_field_passes() {
        let mut form = Form::new(vec![text("company", "")]);
        assert_eq!(form.validate_required(), None);
        assert!(form.is_submittable());
    }
}
