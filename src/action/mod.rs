//! Business actions
//!
//! An action turns one validated command into one entity, ready to be
//! staged. It may read its own kind's committed rows through the repository
//! it owns, but everything else it needs must already be attached to the
//! command. Actions never stage or commit anything.

mod register;

pub use register::{
    RegisterConstructionAction, RegisterMaterial, RegisterOrgUnit, RegisterPlan,
    RegisterProperty, RegisterProvince, RegisterSpecialty, RegisterUnitOfMeasure,
    RegisterWorkObject,
};

use crate::core::{BizError, EntityId, Result};
use crate::storage::{Entity, Repository};
use crate::validation::Validate;
use async_trait::async_trait;

/// Converts a validated `Command` into an `Entity`.
///
/// # Errors
/// A missing attached reference or a duplicate is fatal for the invocation
/// and is reported as `Err`, never as a validation violation.
#[async_trait]
pub trait BusinessAction: Send + Sync {
    type Command: Validate + Send + Sync;
    type Entity: Entity;

    async fn execute(&self, command: &Self::Command) -> Result<Self::Entity>;
}

/// Attached reference, or `MissingReference` naming what was expected.
pub(crate) fn attached<'a, T>(reference: &'a Option<T>, what: &str) -> Result<&'a T> {
    reference.as_ref().ok_or_else(|| {
        BizError::MissingReference(format!("{} is not attached to the command", what))
    })
}

/// Identity of an attached, already persisted reference.
pub(crate) fn attached_id<T: Entity>(reference: &Option<T>, what: &str) -> Result<EntityId> {
    let entity = attached(reference, what)?;
    if entity.id() <= 0 {
        return Err(BizError::MissingReference(format!(
            "{} has not been persisted",
            what
        )));
    }
    Ok(entity.id())
}

/// Fails with `Duplicate` when a committed row shares `candidate`'s natural key.
pub(crate) async fn ensure_unique<T, R>(repository: &R, candidate: &T) -> Result<()>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    let Some(key) = candidate.unique_key() else {
        return Ok(());
    };

    let clash = repository
        .all()
        .await?
        .into_iter()
        .find(|row| {
            row.id() != candidate.id() && row.unique_key().as_deref() == Some(key.as_str())
        });

    match clash {
        Some(row) => Err(BizError::Duplicate(format!(
            "{} {} already holds this key",
            T::KIND,
            row.id()
        ))),
        None => Ok(()),
    }
}
