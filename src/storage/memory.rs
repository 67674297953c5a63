use super::{Entity, Record, Tables};
use crate::config::StoreConfig;
use crate::core::{EntityId, EntityKind, Result};
use crate::transaction::{Change, UnitOfWork};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

/// In-memory transactional store
///
/// Committed state is an immutable [`Tables`] value behind an `Arc`. Readers
/// clone the `Arc` and never block writers for longer than the swap; a
/// commit builds the next state on a copy and swaps it in, so a failed
/// commit leaves nothing behind.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    config: StoreConfig,
    tables: RwLock<Arc<Tables>>,
    /// Per-kind identity sequences; reserved ids are never reused, even
    /// when the unit of work that reserved them rolls back.
    sequences: Mutex<HashMap<EntityKind, EntityId>>,
    commits: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                config,
                tables: RwLock::new(Arc::new(Tables::default())),
                sequences: Mutex::new(HashMap::new()),
                commits: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Start a unit of work against this store
    pub fn begin(&self) -> UnitOfWork {
        UnitOfWork::new(self.clone())
    }

    /// Current committed state
    pub async fn snapshot(&self) -> Arc<Tables> {
        self.inner.tables.read().await.clone()
    }

    pub async fn find<T: Entity>(&self, id: EntityId) -> Option<T> {
        let tables = self.snapshot().await;
        T::table(&tables).get(id).cloned()
    }

    pub async fn all<T: Entity>(&self) -> Vec<T> {
        let tables = self.snapshot().await;
        T::table(&tables).scan()
    }

    /// All committed rows of `kind` as tagged records
    pub async fn fetch(&self, kind: EntityKind) -> Vec<Record> {
        self.snapshot().await.fetch(kind)
    }

    pub async fn row_count(&self, kind: EntityKind) -> usize {
        self.snapshot().await.row_count(kind)
    }

    /// Number of successful commits since the store was created
    pub fn commit_count(&self) -> u64 {
        self.inner.commits.load(Ordering::SeqCst)
    }

    pub fn same_store(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn reserve_id(&self, kind: EntityKind) -> Result<EntityId> {
        let mut sequences = self.inner.sequences.lock()?;
        let next = sequences.entry(kind).or_insert(0);
        *next += 1;
        Ok(*next)
    }

    /// Apply a change list atomically
    pub(crate) async fn apply(&self, changes: Vec<Change>) -> Result<()> {
        let enforce_unique = self.inner.config.enforce_unique_keys;
        let mut guard = self.inner.tables.write().await;

        let mut next = Tables::clone(&guard);
        for (position, change) in changes.iter().enumerate() {
            if let Err(err) = next.apply(change, enforce_unique) {
                warn!(
                    "store '{}': change {} ({} {}) rejected: {}",
                    self.inner.config.name,
                    position,
                    change.kind(),
                    change.entity_id(),
                    err
                );
                return Err(err);
            }
        }

        *guard = Arc::new(next);
        let version = self.inner.commits.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "store '{}': committed {} change(s), version {}",
            self.inner.config.name,
            changes.len(),
            version
        );
        Ok(())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
