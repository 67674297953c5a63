//! Validation Engine
//!
//! Commands declare their field constraints through [`Validate`]; the
//! [`Validator`] evaluates every constraint of every field and collects all
//! violations in declaration order. A failing field never stops evaluation
//! of the fields after it.

mod result;
mod rule;

pub use result::{ValidationResult, Violation};
pub use rule::{Constraint, FieldValue, ValidationRule};

/// Constraints declared on a single field of a command.
pub struct FieldRules<'a> {
    pub field: &'static str,
    pub value: FieldValue<'a>,
    pub constraints: Vec<Constraint>,
}

impl<'a> FieldRules<'a> {
    pub fn new(field: &'static str, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            field,
            value: value.into(),
            constraints: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::Required);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.constraints.push(Constraint::max_length(max));
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints.push(Constraint::range(min, max));
        self
    }
}

/// Implemented by every command that can be run through the pipeline.
pub trait Validate {
    /// Field constraints in declaration order.
    fn rules(&self) -> Vec<FieldRules<'_>>;
}

/// Evaluates declared constraints, plus any extra rules applied to every
/// field.
#[derive(Default)]
pub struct Validator {
    extra: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rules checked against every declared field after its own
    /// constraints.
    pub fn with_rules(rules: Vec<Box<dyn ValidationRule>>) -> Self {
        Self { extra: rules }
    }

    pub fn validate<C: Validate + ?Sized>(&self, command: &C) -> ValidationResult {
        command
            .rules()
            .iter()
            .flat_map(|rules| {
                rules
                    .constraints
                    .iter()
                    .map(|c| c as &dyn ValidationRule)
                    .chain(self.extra.iter().map(|r| r.as_ref() as &dyn ValidationRule))
                    .filter_map(move |rule| rule.check(rules.field, &rules.value))
            })
            .collect()
    }
}

/// Validates with the declared constraints only.
pub fn validate<C: Validate + ?Sized>(command: &C) -> ValidationResult {
    Validator::new().validate(command)
}
