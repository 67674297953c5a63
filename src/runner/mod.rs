//! Action Runner
//!
//! Drives one command through validate -> execute -> stage -> commit.
//! A runner built with [`ActionRunner::linking_owner`] also stages the new
//! id into its owner's child collection, in the same unit of work.
//! Validation failures come back as [`RunOutcome::Rejected`]; anything that
//! goes wrong after validation is a fatal [`BizError`](crate::core::BizError).

mod outcome;
mod state;

pub use outcome::RunOutcome;
pub use state::RunState;

use crate::action::BusinessAction;
use crate::core::Result;
use crate::storage::{Entity, Repository, Store, StoreRepository};
use crate::transaction::{Change, UnitOfWork};
use crate::validation::Validator;
use tracing::{Instrument, Level, event, info_span};

type DefaultRepository<A> = StoreRepository<<A as BusinessAction>::Entity>;

/// Generic pipeline over a [`BusinessAction`] and a repository for its entity
pub struct ActionRunner<A: BusinessAction, R = DefaultRepository<A>> {
    store: Store,
    action: A,
    repository: R,
    validator: Validator,
    link_owner: bool,
}

impl<A: BusinessAction> ActionRunner<A> {
    /// Runner persisting through a [`StoreRepository`] on `store`
    pub fn with_store(store: Store, action: A) -> Self {
        let repository = StoreRepository::new(store.clone());
        Self::new(store, action, repository)
    }
}

impl<A, R> ActionRunner<A, R>
where
    A: BusinessAction,
    R: Repository<A::Entity>,
{
    pub fn new(store: Store, action: A, repository: R) -> Self {
        Self {
            store,
            action,
            repository,
            validator: Validator::new(),
            link_owner: false,
        }
    }

    /// Replace the validator, e.g. one carrying extra rules
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Also append each committed entity to its owner's child collection
    pub fn linking_owner(mut self) -> Self {
        self.link_owner = true;
        self
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Validate, execute and commit `command`.
    ///
    /// On rejection no unit of work is created and the store is not touched.
    /// On success exactly one commit has been performed and the returned
    /// entity carries its assigned identity. The owner link, when enabled,
    /// is part of that commit.
    ///
    /// # Errors
    /// Any fatal error from the action, the repository or the commit. The
    /// unit of work is rolled back before the error is returned.
    pub async fn run(&self, command: &A::Command) -> Result<RunOutcome<A::Entity>> {
        let kind = <A::Entity as Entity>::KIND;
        let span = info_span!("runner.run", kind = %kind);
        self.drive(command).instrument(span).await
    }

    async fn drive(&self, command: &A::Command) -> Result<RunOutcome<A::Entity>> {
        let mut state = RunState::Created;
        transition(&mut state, RunState::Validating)?;

        let result = self.validator.validate(command);
        if !result.is_valid() {
            transition(&mut state, RunState::Rejected)?;
            event!(Level::INFO, violations = result.len(), "command rejected");
            return Ok(RunOutcome::Rejected(result));
        }

        transition(&mut state, RunState::Executing)?;
        let mut entity = match self.action.execute(command).await {
            Ok(entity) => entity,
            Err(err) => return Err(fail(&mut state, err)),
        };

        let mut uow = self.store.begin();
        if let Err(err) = self.stage(&mut uow, &mut entity).await {
            return Err(fail(&mut state, err));
        }

        transition(&mut state, RunState::Committing)?;
        if let Err(err) = uow.commit().await {
            return Err(fail(&mut state, err));
        }

        transition(&mut state, RunState::Committed)?;
        event!(Level::INFO, id = entity.id(), "command committed");
        Ok(RunOutcome::Committed(entity))
    }

    async fn stage(&self, uow: &mut UnitOfWork, entity: &mut A::Entity) -> Result<()> {
        self.repository.add(uow, entity).await?;
        if !self.link_owner {
            return Ok(());
        }
        if let Some((kind, id)) = entity.owner() {
            uow.stage(Change::Link {
                kind,
                id,
                child: entity.id(),
            })?;
        }
        Ok(())
    }
}

fn transition(state: &mut RunState, next: RunState) -> Result<()> {
    let from = *state;
    state.advance(next)?;
    event!(Level::DEBUG, from = %from, to = %next, "run transition");
    Ok(())
}

fn fail<E: std::fmt::Display>(state: &mut RunState, err: E) -> E {
    if state.advance(RunState::Failed).is_ok() {
        event!(Level::ERROR, error = %err, "run failed");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{RegisterUnitOfMeasure, RegisterWorkObject};
    use crate::core::{BizError, EntityKind, NO_IDENTITY};
    use crate::domain::{Property, UnitOfMeasureCommand, WorkObjectCommand};

    fn runner(store: &Store) -> ActionRunner<RegisterUnitOfMeasure> {
        let action = RegisterUnitOfMeasure::new(StoreRepository::new(store.clone()));
        ActionRunner::with_store(store.clone(), action)
    }

    #[tokio::test]
    async fn test_valid_command_commits_once() {
        let store = Store::new();
        let outcome = runner(&store)
            .run(&UnitOfMeasureCommand { name: "m2".into() })
            .await
            .unwrap();

        assert!(outcome.is_committed());
        assert_eq!(outcome.id(), 1);
        assert_eq!(store.commit_count(), 1);
        assert_eq!(store.row_count(EntityKind::UnitOfMeasure).await, 1);
    }

    #[tokio::test]
    async fn test_invalid_command_touches_nothing() {
        let store = Store::new();
        let outcome = runner(&store)
            .run(&UnitOfMeasureCommand {
                name: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(outcome.id(), NO_IDENTITY);
        assert_eq!(outcome.errors().len(), 1);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_is_fatal_and_uncommitted() {
        let store = Store::new();
        let runner = runner(&store);
        runner
            .run(&UnitOfMeasureCommand { name: "kg".into() })
            .await
            .unwrap();

        let err = runner
            .run(&UnitOfMeasureCommand { name: "KG".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, BizError::Duplicate(_)));
        assert_eq!(store.commit_count(), 1);
    }

    fn work_object_runner(store: &Store) -> ActionRunner<RegisterWorkObject> {
        let action = RegisterWorkObject::new(StoreRepository::new(store.clone()));
        ActionRunner::with_store(store.clone(), action).linking_owner()
    }

    async fn seed_property(store: &Store) -> Property {
        let repo = StoreRepository::<Property>::new(store.clone());
        let mut property = Property {
            address: "Calle 8".into(),
            org_unit: Some(1),
            ..Default::default()
        };
        let mut uow = store.begin();
        repo.add(&mut uow, &mut property).await.unwrap();
        uow.commit().await.unwrap();
        property
    }

    #[tokio::test]
    async fn test_owner_link_commits_with_the_insert() {
        let store = Store::new();
        let property = seed_property(&store).await;

        let outcome = work_object_runner(&store)
            .run(&WorkObjectCommand {
                name: "Nave".into(),
                property: Some(property.clone()),
            })
            .await
            .unwrap();

        assert_eq!(store.commit_count(), 2);
        let stored = StoreRepository::<Property>::new(store.clone())
            .find(property.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.work_objects, vec![outcome.id()]);
    }

    #[tokio::test]
    async fn test_missing_owner_fails_the_whole_commit() {
        let store = Store::new();
        let detached = Property {
            id: 42,
            address: "Calle 9".into(),
            ..Default::default()
        };

        let err = work_object_runner(&store)
            .run(&WorkObjectCommand {
                name: "Nave".into(),
                property: Some(detached),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BizError::TargetNotFound {
                kind: EntityKind::Property,
                id: 42
            }
        ));
        assert_eq!(store.row_count(EntityKind::WorkObject).await, 0);
        assert_eq!(store.commit_count(), 0);
    }
}
