use crate::core::{EntityId, NO_IDENTITY};
use crate::storage::Entity;
use crate::validation::{ValidationResult, Violation};
use serde::Serialize;

/// Result of a runner invocation that did not fail fatally
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RunOutcome<E> {
    /// Validated, executed and committed; carries the persisted entity.
    Committed(E),
    /// Validation failed; nothing was executed or staged.
    Rejected(ValidationResult),
}

impl<E: Entity> RunOutcome<E> {
    /// Assigned identity, or [`NO_IDENTITY`] when rejected
    pub fn id(&self) -> EntityId {
        match self {
            Self::Committed(entity) => entity.id(),
            Self::Rejected(_) => NO_IDENTITY,
        }
    }

    pub fn entity(&self) -> Option<&E> {
        match self {
            Self::Committed(entity) => Some(entity),
            Self::Rejected(_) => None,
        }
    }

    pub fn into_entity(self) -> Option<E> {
        match self {
            Self::Committed(entity) => Some(entity),
            Self::Rejected(_) => None,
        }
    }

    /// Violations; empty on success
    pub fn errors(&self) -> &[Violation] {
        match self {
            Self::Committed(_) => &[],
            Self::Rejected(result) => result.violations(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
