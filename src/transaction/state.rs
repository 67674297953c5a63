//! Change log of one unit of work
//!
//! A log accepts changes only while it is open. Committing or rolling back
//! closes it for good.

use super::Change;
use crate::core::{BizError, Result};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide sequence number of a unit of work, used in logs and errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u64);

impl TransactionId {
    pub fn new() -> Self {
        TransactionId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uow#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Committed,
    RolledBack,
}

impl TransactionState {
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionState::Active)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionState::Active => "active",
            TransactionState::Committed => "committed",
            TransactionState::RolledBack => "rolled back",
        })
    }
}

#[derive(Debug)]
pub struct Transaction {
    id: TransactionId,
    state: TransactionState,
    changes: Vec<Change>,
    opened: Instant,
}

impl Transaction {
    pub fn new(id: TransactionId) -> Self {
        Self {
            id,
            state: TransactionState::Active,
            changes: Vec::new(),
            opened: Instant::now(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Time since the log was opened
    pub fn duration(&self) -> Duration {
        self.opened.elapsed()
    }

    pub fn record_change(&mut self, change: Change) -> Result<()> {
        self.ensure_active("stage a change")?;
        self.changes.push(change);
        Ok(())
    }

    /// Empty the log for application, keeping it open until `commit` or
    /// `rollback` settles the outcome.
    pub fn take_changes(&mut self) -> Result<Vec<Change>> {
        self.ensure_active("commit")?;
        Ok(std::mem::take(&mut self.changes))
    }

    pub fn commit(&mut self) -> Result<()> {
        self.ensure_active("commit")?;
        self.state = TransactionState::Committed;
        Ok(())
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.ensure_active("roll back")?;
        self.changes.clear();
        self.state = TransactionState::RolledBack;
        Ok(())
    }

    fn ensure_active(&self, action: &str) -> Result<()> {
        if self.state.is_active() {
            return Ok(());
        }
        Err(BizError::TransactionError(format!(
            "cannot {}: {} is already {}",
            action, self.id, self.state
        )))
    }
}
