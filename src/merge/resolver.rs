use super::Merge;
use crate::core::{BizError, EntityId, Result};
use crate::storage::{Entity, Repository, StoreRepository};
use crate::transaction::UnitOfWork;
use std::marker::PhantomData;
use tracing::{Level, event};

/// Computes merges against persisted entities and stages the result.
///
/// Staging goes through the repository's `update`; committing is left to
/// the caller, who owns the unit of work.
pub struct MergeResolver<T, R = StoreRepository<T>> {
    repository: R,
    _entity: PhantomData<fn() -> T>,
}

impl<T, R> MergeResolver<T, R>
where
    T: Entity + Merge,
    R: Repository<T>,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            _entity: PhantomData,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Merge `update` into the persisted entity `target_id` without staging.
    ///
    /// # Errors
    /// `TargetNotFound` if no such entity is committed.
    pub async fn resolve(&self, target_id: EntityId, update: &T) -> Result<T> {
        let existing = self
            .repository
            .find(target_id)
            .await?
            .ok_or_else(|| BizError::not_found(T::KIND, target_id))?;

        Ok(T::merge(&existing, update))
    }

    /// Merge and stage the result as an update on `uow`.
    pub async fn stage(
        &self,
        uow: &mut UnitOfWork,
        target_id: EntityId,
        update: &T,
    ) -> Result<T> {
        let merged = self.resolve(target_id, update).await?;
        self.repository.update(uow, &merged).await?;

        let kind = T::KIND;
        event!(
            Level::DEBUG,
            kind = %kind,
            id = target_id,
            txn = %uow.id(),
            "merge staged"
        );
        Ok(merged)
    }
}
