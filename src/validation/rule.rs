//! Field-level constraints
//!
//! Each constraint inspects one field value and reports at most one
//! violation. Constraints never look at other fields.

use super::Violation;

/// Borrowed view of a command field, as seen by the constraints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    OptionalText(Option<&'a str>),
    Number(f64),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::Text(value)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        FieldValue::OptionalText(value.as_deref())
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue<'_> {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

/// A single check over a field value.
pub trait ValidationRule: Send + Sync {
    fn check(&self, field: &str, value: &FieldValue<'_>) -> Option<Violation>;
}

/// Declarative constraints a command attaches to its fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Text must be present and not blank.
    Required,
    /// Character count bounds, inclusive. Absent text is not length-checked.
    StringLength { min: usize, max: usize },
    /// Numeric bounds, inclusive.
    Range { min: f64, max: f64 },
}

impl Constraint {
    pub fn max_length(max: usize) -> Self {
        Constraint::StringLength { min: 0, max }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Constraint::Range { min, max }
    }
}

impl ValidationRule for Constraint {
    fn check(&self, field: &str, value: &FieldValue<'_>) -> Option<Violation> {
        match (self, value) {
            (Constraint::Required, FieldValue::Text(text))
            | (Constraint::Required, FieldValue::OptionalText(Some(text))) => text
                .trim()
                .is_empty()
                .then(|| Violation::new(field, format!("The {} field is required.", field))),
            (Constraint::Required, FieldValue::OptionalText(None)) => Some(Violation::new(
                field,
                format!("The {} field is required.", field),
            )),
            (Constraint::Required, FieldValue::Number(n)) => n
                .is_nan()
                .then(|| Violation::new(field, format!("The {} field is required.", field))),

            (Constraint::StringLength { min, max }, FieldValue::Text(text))
            | (Constraint::StringLength { min, max }, FieldValue::OptionalText(Some(text))) => {
                let len = text.chars().count();
                (len < *min || len > *max).then(|| {
                    Violation::new(field, length_message(field, *min, *max))
                })
            }
            (Constraint::StringLength { .. }, _) => None,

            (Constraint::Range { min, max }, FieldValue::Number(n)) => {
                (n.is_nan() || *n < *min || *n > *max).then(|| {
                    Violation::new(
                        field,
                        format!("The field {} must be between {} and {}.", field, min, max),
                    )
                })
            }
            (Constraint::Range { .. }, _) => Some(Violation::new(
                field,
                format!("The field {} must be a number.", field),
            )),
        }
    }
}

fn length_message(field: &str, min: usize, max: usize) -> String {
    if min == 0 {
        format!(
            "The field {} must be a string with a maximum length of {}.",
            field, max
        )
    } else {
        format!(
            "The field {} must be a string with a minimum length of {} and a maximum length of {}.",
            field, min, max
        )
    }
}
