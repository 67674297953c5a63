use super::{Change, Transaction, TransactionId, TransactionState};
use crate::core::{BizError, Result};
use crate::storage::Store;
use log::{debug, warn};

/// Transactional boundary of one business operation
///
/// Obtained from [`Store::begin`] and passed by `&mut` to the repository
/// calls that stage mutations. `commit` and `rollback` consume the handle;
/// dropping an uncommitted handle discards its changes.
pub struct UnitOfWork {
    store: Store,
    txn: Transaction,
}

impl UnitOfWork {
    pub(crate) fn new(store: Store) -> Self {
        Self {
            store,
            txn: Transaction::new(TransactionId::new()),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.txn.id()
    }

    pub fn state(&self) -> TransactionState {
        self.txn.state()
    }

    pub fn changes(&self) -> &[Change] {
        self.txn.changes()
    }

    pub fn change_count(&self) -> usize {
        self.txn.change_count()
    }

    pub fn belongs_to(&self, store: &Store) -> bool {
        self.store.same_store(store)
    }

    /// Record a mutation to apply at commit
    pub fn stage(&mut self, change: Change) -> Result<()> {
        let max = self.store.config().max_staged_changes;
        if self.txn.change_count() >= max {
            return Err(BizError::TransactionError(format!(
                "transaction {} exceeds the limit of {} staged changes",
                self.txn.id(),
                max
            )));
        }
        self.txn.record_change(change)
    }

    /// Durably apply every staged change, or none of them
    pub async fn commit(mut self) -> Result<()> {
        let changes = self.txn.take_changes()?;
        let count = changes.len();

        match self.store.apply(changes).await {
            Ok(()) => {
                self.txn.commit()?;
                debug!(
                    "{} committed {} change(s) in {:?}",
                    self.txn.id(),
                    count,
                    self.txn.duration()
                );
                Ok(())
            }
            Err(err) => {
                self.txn.rollback()?;
                warn!("{} rolled back: {}", self.txn.id(), err);
                Err(err)
            }
        }
    }

    /// Discard every staged change
    pub fn rollback(mut self) -> Result<()> {
        debug!(
            "{} rolled back {} staged change(s)",
            self.txn.id(),
            self.txn.change_count()
        );
        self.txn.rollback()
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.txn.state().is_active() {
            if self.txn.change_count() > 0 {
                debug!(
                    "{} dropped with {} uncommitted change(s)",
                    self.txn.id(),
                    self.txn.change_count()
                );
            }
            let _ = self.txn.rollback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::core::EntityKind;
    use crate::domain::{Material, Province};
    use crate::storage::Record;

    fn province(id: i64, name: &str) -> Change {
        Change::Insert(Record::Province(Province {
            id,
            name: name.to_string(),
        }))
    }

    #[tokio::test]
    async fn test_commit_applies_all_changes() {
        let store = Store::new();
        let mut uow = store.begin();
        uow.stage(province(1, "Pinar del Rio")).unwrap();
        uow.stage(province(2, "Mayabeque")).unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.row_count(EntityKind::Province).await, 2);
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards() {
        let store = Store::new();
        let mut uow = store.begin();
        uow.stage(province(1, "Sancti Spiritus")).unwrap();
        uow.rollback().unwrap();

        assert_eq!(store.row_count(EntityKind::Province).await, 0);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_without_commit_discards() {
        let store = Store::new();
        {
            let mut uow = store.begin();
            uow.stage(province(1, "Las Tunas")).unwrap();
        }
        assert_eq!(store.row_count(EntityKind::Province).await, 0);
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_store_untouched() {
        let store = Store::new();
        let mut uow = store.begin();
        uow.stage(province(1, "Camaguey")).unwrap();
        uow.stage(Change::Update(Record::Material(Material {
            id: 42,
            ..Default::default()
        })))
        .unwrap();

        let err = uow.commit().await.unwrap_err();
        assert!(matches!(
            err,
            BizError::TargetNotFound {
                kind: EntityKind::Material,
                id: 42
            }
        ));
        assert_eq!(store.row_count(EntityKind::Province).await, 0);
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_staged_change_cap() {
        let store = Store::with_config(StoreConfig::default().max_staged_changes(1));
        let mut uow = store.begin();
        uow.stage(province(1, "Guantanamo")).unwrap();
        assert!(uow.stage(province(2, "Santiago")).is_err());
        assert_eq!(uow.change_count(), 1);
    }
}
