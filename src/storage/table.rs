use super::Entity;
use crate::core::{BizError, EntityId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Committed rows of one entity kind, keyed by identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table<T> {
    rows: BTreeMap<EntityId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in identity order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn scan(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub fn find_by(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.values().find(|row| predicate(row))
    }

    pub fn insert(&mut self, row: T, enforce_unique: bool) -> Result<()> {
        let id = row.id();
        if id <= 0 {
            return Err(BizError::ConstraintViolation(format!(
                "{} row has no assigned identity",
                T::KIND
            )));
        }
        if self.rows.contains_key(&id) {
            return Err(BizError::ConstraintViolation(format!(
                "{} with id {} already exists",
                T::KIND,
                id
            )));
        }
        if enforce_unique {
            self.check_uniqueness(&row, None)?;
        }

        self.rows.insert(id, row);
        Ok(())
    }

    pub fn update(&mut self, row: T, enforce_unique: bool) -> Result<()> {
        let id = row.id();
        if !self.rows.contains_key(&id) {
            return Err(BizError::not_found(T::KIND, id));
        }
        if enforce_unique {
            self.check_uniqueness(&row, Some(id))?;
        }

        self.rows.insert(id, row);
        Ok(())
    }

    pub fn delete(&mut self, id: EntityId) -> Result<T> {
        self.rows
            .remove(&id)
            .ok_or_else(|| BizError::not_found(T::KIND, id))
    }

    /// Append `child` to the child collection of row `id` unless it is
    /// already listed.
    pub fn link(&mut self, id: EntityId, child: EntityId) -> Result<()> {
        let row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| BizError::not_found(T::KIND, id))?;
        let children = row.children_mut().ok_or_else(|| {
            BizError::ConstraintViolation(format!("{} rows have no child collection", T::KIND))
        })?;

        if !children.contains(&child) {
            children.push(child);
        }
        Ok(())
    }

    pub fn unlink(&mut self, id: EntityId, child: EntityId) {
        if let Some(children) = self.rows.get_mut(&id).and_then(|row| row.children_mut()) {
            children.retain(|listed| *listed != child);
        }
    }

    fn check_uniqueness(&self, row: &T, exclude: Option<EntityId>) -> Result<()> {
        let Some(key) = row.unique_key() else {
            return Ok(());
        };

        let clash = self
            .rows
            .values()
            .filter(|existing| Some(existing.id()) != exclude)
            .any(|existing| existing.unique_key().as_deref() == Some(key.as_str()));

        if clash {
            return Err(BizError::ConstraintViolation(format!(
                "{} with the same natural key already exists",
                T::KIND
            )));
        }
        Ok(())
    }
}
