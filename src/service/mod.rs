//! Service layer
//!
//! Entry points used by the application front end. Services resolve the
//! references a command needs by natural key, attach them, and hand the
//! command to the matching runner. Updates go through the merge resolver,
//! one unit of work per call.

mod admin;
mod investor;

pub use admin::AdminService;
pub use investor::InvestorService;

use crate::core::{BizError, EntityId, NO_IDENTITY, Result};
use crate::merge::{Merge, MergeResolver};
use crate::runner::RunOutcome;
use crate::storage::{Entity, Repository, Store, StoreRepository};
use crate::transaction::Change;
use crate::validation::{ValidationResult, Violation};
use serde::Serialize;

/// Outcome of a registration: the new identity, or why it was refused
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Registration {
    Registered(EntityId),
    Rejected(ValidationResult),
}

impl Registration {
    /// New identity, or [`NO_IDENTITY`] when rejected
    pub fn id(&self) -> EntityId {
        match self {
            Self::Registered(id) => *id,
            Self::Rejected(_) => NO_IDENTITY,
        }
    }

    pub fn errors(&self) -> &[Violation] {
        match self {
            Self::Registered(_) => &[],
            Self::Rejected(result) => result.violations(),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

impl<E: Entity> From<RunOutcome<E>> for Registration {
    fn from(outcome: RunOutcome<E>) -> Self {
        match outcome {
            RunOutcome::Committed(entity) => Self::Registered(entity.id()),
            RunOutcome::Rejected(errors) => Self::Rejected(errors),
        }
    }
}

/// Merge `update` into entity `target_id` and commit it on its own unit of work
pub(crate) async fn merge_and_commit<T>(store: &Store, target_id: EntityId, update: &T) -> Result<T>
where
    T: Entity + Merge,
{
    let resolver = MergeResolver::new(StoreRepository::<T>::new(store.clone()));
    let mut uow = store.begin();
    let merged = resolver.stage(&mut uow, target_id, update).await?;
    uow.commit().await?;
    Ok(merged)
}

/// Remove entity `id`, returning the removed row. Its owner, if still
/// present, stops listing it in the same commit.
pub(crate) async fn delete<T: Entity>(store: &Store, id: EntityId) -> Result<T> {
    let repository = StoreRepository::<T>::new(store.clone());
    let existing = repository
        .find(id)
        .await?
        .ok_or_else(|| BizError::not_found(T::KIND, id))?;

    let mut uow = store.begin();
    repository.remove(&mut uow, &existing).await?;
    if let Some((kind, owner)) = existing.owner() {
        uow.stage(Change::Unlink {
            kind,
            id: owner,
            child: id,
        })?;
    }
    uow.commit().await?;
    Ok(existing)
}
