use super::EntityKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BizError {
    #[error("{kind} with id {id} not found")]
    TargetNotFound { kind: EntityKind, id: i64 },

    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BizError {
    /// Shorthand for a lookup that came back empty.
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::TargetNotFound { kind, id }
    }
}

pub type Result<T> = std::result::Result<T, BizError>;

impl<T> From<std::sync::PoisonError<T>> for BizError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for BizError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
