use super::{Entity, Store};
use crate::core::{BizError, EntityId, Result, UNASSIGNED};
use crate::transaction::{Change, UnitOfWork};
use async_trait::async_trait;
use std::marker::PhantomData;

/// CRUD capability over one entity kind
///
/// Mutations are staged on the unit of work passed in and become visible
/// to `find`/`all` only after that unit of work commits.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Stage an insert. Assigns the entity its identity.
    async fn add(&self, uow: &mut UnitOfWork, entity: &mut T) -> Result<()>;

    async fn remove(&self, uow: &mut UnitOfWork, entity: &T) -> Result<()>;

    async fn update(&self, uow: &mut UnitOfWork, entity: &T) -> Result<()>;

    async fn find(&self, id: EntityId) -> Result<Option<T>>;

    /// Committed rows in identity order
    async fn all(&self) -> Result<Vec<T>>;
}

/// Repository backed by the in-memory [`Store`]
pub struct StoreRepository<T> {
    store: Store,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for StoreRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> StoreRepository<T> {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn check_owner(&self, uow: &UnitOfWork) -> Result<()> {
        if !uow.belongs_to(&self.store) {
            return Err(BizError::TransactionError(format!(
                "unit of work {} belongs to another store",
                uow.id()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for StoreRepository<T> {
    async fn add(&self, uow: &mut UnitOfWork, entity: &mut T) -> Result<()> {
        self.check_owner(uow)?;
        if entity.id() != UNASSIGNED {
            return Err(BizError::ConstraintViolation(format!(
                "{} already has identity {}",
                T::KIND,
                entity.id()
            )));
        }

        let id = self.store.reserve_id(T::KIND)?;
        let mut staged = entity.clone();
        staged.set_id(id);
        uow.stage(Change::Insert(staged.into_record()))?;

        entity.set_id(id);
        Ok(())
    }

    async fn remove(&self, uow: &mut UnitOfWork, entity: &T) -> Result<()> {
        self.check_owner(uow)?;
        uow.stage(Change::Delete {
            kind: T::KIND,
            id: entity.id(),
        })
    }

    async fn update(&self, uow: &mut UnitOfWork, entity: &T) -> Result<()> {
        self.check_owner(uow)?;
        uow.stage(Change::Update(entity.clone().into_record()))
    }

    async fn find(&self, id: EntityId) -> Result<Option<T>> {
        Ok(self.store.find(id).await)
    }

    async fn all(&self) -> Result<Vec<T>> {
        Ok(self.store.all().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Specialty;

    fn specialty(kind: &str) -> Specialty {
        Specialty {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_assigns_identity_and_commits() {
        let store = Store::new();
        let repo = StoreRepository::<Specialty>::new(store.clone());

        let mut uow = store.begin();
        let mut electrical = specialty("Electrica");
        repo.add(&mut uow, &mut electrical).await.unwrap();
        assert_eq!(electrical.id, 1);
        assert!(repo.find(1).await.unwrap().is_none());

        uow.commit().await.unwrap();
        assert_eq!(repo.find(1).await.unwrap(), Some(electrical));
    }

    #[tokio::test]
    async fn test_add_rejects_assigned_identity() {
        let store = Store::new();
        let repo = StoreRepository::<Specialty>::new(store.clone());
        let mut uow = store.begin();

        let mut existing = specialty("Civil");
        existing.id = 5;
        assert!(repo.add(&mut uow, &mut existing).await.is_err());
        assert_eq!(uow.change_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_unit_of_work_rejected() {
        let store = Store::new();
        let other = Store::new();
        let repo = StoreRepository::<Specialty>::new(store);

        let mut uow = other.begin();
        assert!(matches!(
            repo.add(&mut uow, &mut specialty("Civil")).await,
            Err(BizError::TransactionError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let store = Store::new();
        let repo = StoreRepository::<Specialty>::new(store.clone());

        let mut uow = store.begin();
        let mut civil = specialty("Civil");
        repo.add(&mut uow, &mut civil).await.unwrap();
        uow.commit().await.unwrap();

        civil.kind = "Civil y Estructural".into();
        let mut uow = store.begin();
        repo.update(&mut uow, &civil).await.unwrap();
        uow.commit().await.unwrap();
        assert_eq!(repo.all().await.unwrap(), vec![civil.clone()]);

        let mut uow = store.begin();
        repo.remove(&mut uow, &civil).await.unwrap();
        uow.commit().await.unwrap();
        assert!(repo.all().await.unwrap().is_empty());
    }
}
