// ============================================================================
// Domain Entities
// ============================================================================
//
// Persisted aggregates. Identities are assigned by the store when a row is
// staged; references to other entities are stored as identities, and owned
// collections as lists of identities.
//
// ============================================================================

use crate::core::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: EntityId,
    pub name: String,
}

impl Province {
    pub fn natural_key(&self) -> Option<String> {
        non_empty_key(&[&self.name])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

/// Organizational unit ("UO"): owns properties and the plans drawn up for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: EntityId,
    pub name: String,
    pub province: Option<EntityId>,
    pub properties: Vec<EntityId>,
}

impl OrgUnit {
    pub fn natural_key(&self) -> Option<String> {
        non_empty_key(&[&self.name])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        Some(&mut self.properties)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: EntityId,
    pub year: i32,
    pub budget: f64,
    pub plan_type: Option<String>,
    pub org_unit: Option<EntityId>,
    pub construction_actions: Vec<EntityId>,
}

impl Plan {
    /// One plan per (year, type, org unit).
    pub fn natural_key(&self) -> Option<String> {
        let plan_type = self.plan_type.as_deref()?;
        let org_unit = self
            .org_unit
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        non_empty_key(&[&self.year.to_string(), plan_type, &org_unit])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        Some(&mut self.construction_actions)
    }
}

/// Real-estate property ("inmueble") belonging to an org unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: EntityId,
    pub address: String,
    pub org_unit: Option<EntityId>,
    pub work_objects: Vec<EntityId>,
}

impl Property {
    /// Addresses are unique within an org unit.
    pub fn natural_key(&self) -> Option<String> {
        let org_unit = self.org_unit?;
        non_empty_key(&[&org_unit.to_string(), &self.address])
    }

    /// Listed in its org unit's `properties`.
    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        self.org_unit.map(|id| (EntityKind::OrgUnit, id))
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        Some(&mut self.work_objects)
    }
}

/// A unit of construction work located on a property ("objeto de obra").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkObject {
    pub id: EntityId,
    pub name: String,
    pub property: Option<EntityId>,
}

impl WorkObject {
    pub fn natural_key(&self) -> Option<String> {
        let property = self.property?;
        non_empty_key(&[&property.to_string(), &self.name])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        self.property.map(|id| (EntityKind::Property, id))
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specialty {
    pub id: EntityId,
    pub kind: String,
}

impl Specialty {
    pub fn natural_key(&self) -> Option<String> {
        non_empty_key(&[&self.kind])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitOfMeasure {
    pub id: EntityId,
    pub name: String,
}

impl UnitOfMeasure {
    pub fn natural_key(&self) -> Option<String> {
        non_empty_key(&[&self.name])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: EntityId,
    pub name: String,
    pub unit_of_measure: Option<EntityId>,
}

impl Material {
    pub fn natural_key(&self) -> Option<String> {
        non_empty_key(&[&self.name])
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        None
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

/// Budgeted construction action of a plan, carried out on a work object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionAction {
    pub id: EntityId,
    pub name: String,
    pub unit_of_measure: String,
    pub cost: f64,
    pub plan: Option<EntityId>,
    pub specialty: Option<EntityId>,
    pub work_object: Option<EntityId>,
}

impl ConstructionAction {
    pub fn natural_key(&self) -> Option<String> {
        None
    }

    pub fn parent(&self) -> Option<(EntityKind, EntityId)> {
        self.plan.map(|id| (EntityKind::Plan, id))
    }

    pub fn child_ids_mut(&mut self) -> Option<&mut Vec<EntityId>> {
        None
    }
}

/// Joins key parts case-insensitively; an empty part means "no key".
fn non_empty_key(parts: &[&str]) -> Option<String> {
    if parts.iter().any(|part| part.trim().is_empty()) {
        return None;
    }
    Some(
        parts
            .iter()
            .map(|part| part.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join("\u{1f}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_ignores_case_and_padding() {
        let a = Province { id: 1, name: "Havana".into() };
        let b = Province { id: 2, name: " HAVANA ".into() };
        assert_eq!(a.natural_key(), b.natural_key());
    }

    #[test]
    fn test_property_without_org_unit_has_no_key() {
        let property = Property {
            address: "Calle 23".into(),
            ..Default::default()
        };
        assert!(property.natural_key().is_none());
    }

    #[test]
    fn test_plan_key_requires_type() {
        let mut plan = Plan {
            year: 2024,
            ..Default::default()
        };
        assert!(plan.natural_key().is_none());

        plan.plan_type = Some("Mantenimiento".into());
        assert!(plan.natural_key().is_some());
    }

    #[test]
    fn test_parent_names_the_owning_collection() {
        let work_object = WorkObject {
            property: Some(5),
            ..Default::default()
        };
        assert_eq!(work_object.parent(), Some((EntityKind::Property, 5)));
        assert_eq!(WorkObject::default().parent(), None);

        let mut property = Property::default();
        property.child_ids_mut().unwrap().push(9);
        assert_eq!(property.work_objects, vec![9]);
        assert!(Material::default().child_ids_mut().is_none());
    }
}
