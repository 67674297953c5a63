use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identity of a persisted entity.
pub type EntityId = i64;

/// Identity reported when a command was rejected and nothing was persisted.
pub const NO_IDENTITY: EntityId = -1;

/// Identity of an entity that has not been staged yet.
pub const UNASSIGNED: EntityId = 0;

/// The closed set of entity kinds the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Province,
    OrgUnit,
    Plan,
    Property,
    WorkObject,
    Specialty,
    UnitOfMeasure,
    Material,
    ConstructionAction,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Province,
        EntityKind::OrgUnit,
        EntityKind::Plan,
        EntityKind::Property,
        EntityKind::WorkObject,
        EntityKind::Specialty,
        EntityKind::UnitOfMeasure,
        EntityKind::Material,
        EntityKind::ConstructionAction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Province => "Province",
            EntityKind::OrgUnit => "OrgUnit",
            EntityKind::Plan => "Plan",
            EntityKind::Property => "Property",
            EntityKind::WorkObject => "WorkObject",
            EntityKind::Specialty => "Specialty",
            EntityKind::UnitOfMeasure => "UnitOfMeasure",
            EntityKind::Material => "Material",
            EntityKind::ConstructionAction => "ConstructionAction",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Case-insensitive match on the kind's name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}
