//! Entity catalog
//!
//! The closed set of persisted kinds. `entity_catalog!` generates, from one
//! list, the tagged [`Record`] enum, the [`Tables`] set with one typed table
//! per kind, and the [`Entity`] impls that map each type to its table. Code
//! that needs "all rows of kind X" goes through [`Tables::fetch`] and never
//! casts.

use super::Table;
use crate::core::{EntityId, EntityKind, Result};
use crate::domain::{
    ConstructionAction, Material, OrgUnit, Plan, Property, Province, Specialty, UnitOfMeasure,
    WorkObject,
};
use crate::transaction::Change;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A domain type the store can persist.
pub trait Entity:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const KIND: EntityKind;

    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
    /// Natural key enforced unique at commit; `None` opts out.
    fn unique_key(&self) -> Option<String>;

    /// Row whose child collection lists this one, if any.
    fn owner(&self) -> Option<(EntityKind, EntityId)>;
    fn children_mut(&mut self) -> Option<&mut Vec<EntityId>>;

    fn table(tables: &Tables) -> &Table<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    fn into_record(self) -> Record;
    fn from_record(record: Record) -> Option<Self>;
}

macro_rules! entity_catalog {
    ($($kind:ident => $field:ident),* $(,)?) => {
        /// A row of any kind, tagged with its kind.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "data")]
        pub enum Record {
            $($kind($kind),)*
        }

        impl Record {
            pub fn kind(&self) -> EntityKind {
                match self {
                    $(Record::$kind(_) => EntityKind::$kind,)*
                }
            }

            pub fn id(&self) -> EntityId {
                match self {
                    $(Record::$kind(row) => row.id,)*
                }
            }
        }

        /// Committed state: one table per kind.
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        pub struct Tables {
            $(pub $field: Table<$kind>,)*
        }

        impl Tables {
            /// All committed rows of `kind`, in identity order.
            pub fn fetch(&self, kind: EntityKind) -> Vec<Record> {
                match kind {
                    $(EntityKind::$kind => {
                        self.$field.iter().cloned().map(Record::$kind).collect()
                    })*
                }
            }

            pub fn row_count(&self, kind: EntityKind) -> usize {
                match kind {
                    $(EntityKind::$kind => self.$field.len(),)*
                }
            }

            pub(crate) fn apply(&mut self, change: &Change, enforce_unique: bool) -> Result<()> {
                match change {
                    Change::Insert(record) => match record {
                        $(Record::$kind(row) => self.$field.insert(row.clone(), enforce_unique),)*
                    },
                    Change::Update(record) => match record {
                        $(Record::$kind(row) => self.$field.update(row.clone(), enforce_unique),)*
                    },
                    Change::Delete { kind, id } => match kind {
                        $(EntityKind::$kind => self.$field.delete(*id).map(|_| ()),)*
                    },
                    Change::Link { kind, id, child } => match kind {
                        $(EntityKind::$kind => self.$field.link(*id, *child),)*
                    },
                    Change::Unlink { kind, id, child } => match kind {
                        $(EntityKind::$kind => {
                            self.$field.unlink(*id, *child);
                            Ok(())
                        })*
                    },
                }
            }
        }

        $(
            impl Entity for $kind {
                const KIND: EntityKind = EntityKind::$kind;

                fn id(&self) -> EntityId {
                    self.id
                }

                fn set_id(&mut self, id: EntityId) {
                    self.id = id;
                }

                fn unique_key(&self) -> Option<String> {
                    self.natural_key()
                }

                fn owner(&self) -> Option<(EntityKind, EntityId)> {
                    self.parent()
                }

                fn children_mut(&mut self) -> Option<&mut Vec<EntityId>> {
                    self.child_ids_mut()
                }

                fn table(tables: &Tables) -> &Table<Self> {
                    &tables.$field
                }

                fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
                    &mut tables.$field
                }

                fn into_record(self) -> Record {
                    Record::$kind(self)
                }

                fn from_record(record: Record) -> Option<Self> {
                    match record {
                        Record::$kind(row) => Some(row),
                        _ => None,
                    }
                }
            }
        )*
    };
}

entity_catalog! {
    Province => provinces,
    OrgUnit => org_units,
    Plan => plans,
    Property => properties,
    WorkObject => work_objects,
    Specialty => specialties,
    UnitOfMeasure => units_of_measure,
    Material => materials,
    ConstructionAction => construction_actions,
}
