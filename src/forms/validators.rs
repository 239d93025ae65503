use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s+()\-]{10,20}$").unwrap());

/// What a field currently holds: text for inputs, selects and textareas,
/// the checked state for checkboxes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl FieldValue {
    fn text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Checked(_) => None,
        }
    }
}

pub struct Validator {
    pub key: &'static str,
    pub message: &'static str,
    test: fn(&FieldValue) -> bool,
}

impl Validator {
    pub fn accepts(&self, value: &FieldValue) -> bool {
        (self.test)(value)
    }
}

fn name(value: &FieldValue) -> bool {
    value.text().map_or(false, |t| t.trim().chars().count() >= 2)
}

fn email(value: &FieldValue) -> bool {
    value.text().map_or(false, |t| EMAIL.is_match(t))
}

fn phone(value: &FieldValue) -> bool {
    value.text().map_or(false, |t| PHONE.is_match(t))
}

fn message(value: &FieldValue) -> bool {
    value.text().map_or(false, |t| t.trim().chars().count() >= 10)
}

fn privacy(value: &FieldValue) -> bool {
    *value == FieldValue::Checked(true)
}

static REGISTRY: [Validator; 5] = [
    Validator {
        key: "name",
        message: "Bitte geben Sie einen gültigen Namen ein (mindestens 2 Zeichen)",
        test: name,
    },
    Validator {
        key: "email",
        message: "Bitte geben Sie eine gültige E-Mail-Adresse ein",
        test: email,
    },
    Validator {
        key: "phone",
        message: "Bitte geben Sie eine gültige Telefonnummer ein",
        test: phone,
    },
    Validator {
        key: "message",
        message: "Bitte geben Sie eine Nachricht mit mindestens 10 Zeichen ein",
        test: message,
    },
    Validator {
        key: "privacy",
        message: "Bitte akzeptieren Sie die Datenschutzerklärung",
        test: privacy,
    },
];

pub fn lookup(key: &str) -> Option<&'static Validator> {
    REGISTRY.iter().find(|v| v.key == key)
}

/// Checks `value` against the validator registered for `key`. Keys without
/// a validator always pass; on failure the validator's message comes back.
pub fn check(key: &str, value: &FieldValue) -> Result<(), &'static str> {
    match lookup(key) {
        Some(validator) if !validator.accepts(value) => Err(validator.message),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn name_needs_two_visible_characters() {
        assert!(check("name", &text("Jo")).is_ok());
        assert!(check("name", &text(" J ")).is_err());
        assert!(check("name", &text("   ")).is_err());
        assert!(check("name", &text("Ää")).is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(check("email", &text("a@b.co")).is_ok());
        assert!(check("email", &text("first.last@sub.example.de")).is_ok());
        for bad in ["bad", "a@b", "@b.co", "a@.co", "a b@c.de", "a@b@c.de", ""] {
            assert_eq!(
                check("email", &text(bad)),
                Err("Bitte geben Sie eine gültige E-Mail-Adresse ein"),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn phone_charset_and_length() {
        assert!(check("phone", &text("+49 (30) 123-4567")).is_ok());
        assert!(check("phone", &text("0123456789")).is_ok());
        assert!(check("phone", &text("012345678")).is_err());
        assert!(check("phone", &text("012345678901234567890")).is_err());
        assert!(check("phone", &text("0123 456 78x9")).is_err());
    }

    #[test]
    fn message_needs_ten_characters_after_trimming() {
        assert!(check("message", &text("this is long enough")).is_ok());
        assert!(check("message", &text("   short    ")).is_err());
    }

    #[test]
    fn privacy_needs_a_checked_box() {
        assert!(check("privacy", &FieldValue::Checked(true)).is_ok());
        assert!(check("privacy", &FieldValue::Checked(false)).is_err());
        assert!(check("privacy", &text("true")).is_err());
    }

    #[test]
    fn unregistered_keys_always_pass() {
        assert!(check("company", &text("")).is_ok());
        assert!(check("", &FieldValue::Checked(false)).is_ok());
        assert!(lookup("company").is_none());
    }
}
