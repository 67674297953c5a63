pub mod commands;
pub mod entities;

pub use commands::{
    ConstructionActionCommand, MaterialCommand, OrgUnitCommand, PlanCommand, PropertyCommand,
    ProvinceCommand, SpecialtyCommand, UnitOfMeasureCommand, WorkObjectCommand,
};
pub use entities::{
    ConstructionAction, Material, OrgUnit, Plan, Property, Province, Specialty, UnitOfMeasure,
    WorkObject,
};
