// ============================================================================
// Commands
// ============================================================================
//
// Caller-built requests to register an entity. Scalar fields come from user
// input and carry declared constraints; references to other entities are
// resolved by the caller and attached before the command is run. Attached
// references are never deserialized from input.
//
// ============================================================================

use super::{OrgUnit, Plan, Property, Province, Specialty, UnitOfMeasure, WorkObject};
use crate::core::EntityId;
use crate::validation::{FieldRules, Validate};
use serde::{Deserialize, Serialize};

const NAME_MAX: usize = 100;
const SHORT_NAME_MAX: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvinceCommand {
    pub name: String,
}

impl Validate for ProvinceCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Name", &self.name).required().max_length(SHORT_NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgUnitCommand {
    pub name: String,
    #[serde(skip)]
    pub province: Option<Province>,
}

impl Validate for OrgUnitCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Name", &self.name).required().max_length(NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCommand {
    pub year: i32,
    pub budget: f64,
    pub plan_type: Option<String>,
    #[serde(skip)]
    pub org_unit: Option<OrgUnit>,
}

impl Validate for PlanCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules::new("Year", self.year).range(1900.0, 2100.0),
            FieldRules::new("Budget", self.budget).range(0.0, f64::MAX),
            FieldRules::new("PlanType", &self.plan_type)
                .required()
                .max_length(SHORT_NAME_MAX),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyCommand {
    pub address: String,
    #[serde(skip)]
    pub org_unit: Option<OrgUnit>,
}

impl Validate for PropertyCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Address", &self.address).required().max_length(NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkObjectCommand {
    pub name: String,
    #[serde(skip)]
    pub property: Option<Property>,
}

impl Validate for WorkObjectCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Name", &self.name).required().max_length(NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialtyCommand {
    pub kind: String,
}

impl Validate for SpecialtyCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Kind", &self.kind).required().max_length(SHORT_NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitOfMeasureCommand {
    pub name: String,
}

impl Validate for UnitOfMeasureCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Name", &self.name).required().max_length(20)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialCommand {
    pub name: String,
    #[serde(skip)]
    pub unit_of_measure: Option<UnitOfMeasure>,
}

impl Validate for MaterialCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![FieldRules::new("Name", &self.name).required().max_length(NAME_MAX)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructionActionCommand {
    pub name: String,
    pub unit_of_measure: String,
    pub cost: f64,
    pub plan_id: EntityId,
    pub specialty_kind: String,
    pub work_object_id: EntityId,
    #[serde(skip)]
    pub plan: Option<Plan>,
    #[serde(skip)]
    pub specialty: Option<Specialty>,
    #[serde(skip)]
    pub work_object: Option<WorkObject>,
}

impl Validate for ConstructionActionCommand {
    fn rules(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules::new("Name", &self.name).required().max_length(NAME_MAX),
            FieldRules::new("UnitOfMeasure", &self.unit_of_measure)
                .required()
                .max_length(20),
            FieldRules::new("Cost", self.cost).range(0.0, f64::MAX),
            FieldRules::new("SpecialtyKind", &self.specialty_kind)
                .required()
                .max_length(SHORT_NAME_MAX),
        ]
    }
}
