//! Typed form state shared by the add/edit views.
//!
//! A form holds a value of the record it edits. Inputs arrive as a field enum
//! (one variant per input) and are applied through [`FieldEdit`], so every
//! edit is a typed mutation of one named field.

use thiserror::Error;

/// One input change for a record of type `T`.
pub trait FieldEdit<T> {
    fn apply(self, target: &mut T);
}

/// Required fields that were missing or malformed at submit time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    /// `Ok` when nothing was collected.
    pub fn check(fields: Vec<&'static str>) -> Result<(), ValidationError> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { fields })
        }
    }
}

/// Form state: the edited value, the value a reset returns to and whether a
/// submit was attempted (which turns on field-level feedback).
#[derive(Debug, Clone, PartialEq)]
pub struct Form<T: Clone> {
    value: T,
    initial: T,
    validated: bool,
}

impl<T: Clone> Form<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial.clone(),
            initial,
            validated: false,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    pub fn edit<F: FieldEdit<T>>(&mut self, field: F) {
        field.apply(&mut self.value);
    }

    /// Replaces the current value, e.g. with a record loaded from the server.
    pub fn load(&mut self, value: T) {
        self.value = value;
    }

    pub fn mark_validated(&mut self) {
        self.validated = true;
    }

    pub fn reset(&mut self) {
        self.value = self.initial.clone();
        self.validated = false;
    }
}

/// Email shape as browsers check `type="email"`: a non-empty local part and
/// dot-separated domain labels of letters, digits and inner hyphens.
/// `user@localhost` passes.
pub fn looks_like_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Pushes `name` when `value` is blank.
pub(crate) fn require(missing: &mut Vec<&'static str>, name: &'static str, value: &str) {
    if value.trim().is_empty() {
        missing.push(name);
    }
}
