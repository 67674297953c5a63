// ============================================================================
// Staged Change Tracking
// ============================================================================
//
// Each Change is one mutation recorded by a unit of work. Nothing touches the
// committed tables until COMMIT replays the whole list; ROLLBACK just drops
// it.
//
// ============================================================================

use crate::core::{EntityId, EntityKind};
use crate::storage::Record;

/// A single staged mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Insert a new row; the record already carries its reserved identity
    Insert(Record),

    /// Replace an existing row with the same identity
    Update(Record),

    /// Remove an existing row
    Delete { kind: EntityKind, id: EntityId },

    /// Add `child` to the child collection of row `id`, as that row stands
    /// at commit
    Link {
        kind: EntityKind,
        id: EntityId,
        child: EntityId,
    },

    /// Drop `child` from the child collection of row `id`; a no-op if the
    /// row is gone
    Unlink {
        kind: EntityKind,
        id: EntityId,
        child: EntityId,
    },
}

impl Change {
    /// Get the entity kind affected by this change
    pub fn kind(&self) -> EntityKind {
        match self {
            Change::Insert(record) | Change::Update(record) => record.kind(),
            Change::Delete { kind, .. }
            | Change::Link { kind, .. }
            | Change::Unlink { kind, .. } => *kind,
        }
    }

    /// Get the identity of the row affected by this change
    pub fn entity_id(&self) -> EntityId {
        match self {
            Change::Insert(record) | Change::Update(record) => record.id(),
            Change::Delete { id, .. } | Change::Link { id, .. } | Change::Unlink { id, .. } => *id,
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Change::Insert(_))
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Change::Update(_))
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Change::Delete { .. })
    }

    /// Link or unlink of a child id
    pub fn is_link(&self) -> bool {
        matches!(self, Change::Link { .. } | Change::Unlink { .. })
    }
}
