use super::{BusinessAction, attached_id, ensure_unique};
use crate::core::Result;
use crate::domain::{
    ConstructionAction, ConstructionActionCommand, Material, MaterialCommand, OrgUnit,
    OrgUnitCommand, Plan, PlanCommand, Property, PropertyCommand, Province, ProvinceCommand,
    Specialty, SpecialtyCommand, UnitOfMeasure, UnitOfMeasureCommand, WorkObject,
    WorkObjectCommand,
};
use crate::storage::StoreRepository;
use async_trait::async_trait;

macro_rules! register_action {
    ($(#[$meta:meta])* $name:ident => $entity:ty) => {
        $(#[$meta])*
        pub struct $name {
            repository: StoreRepository<$entity>,
        }

        impl $name {
            pub fn new(repository: StoreRepository<$entity>) -> Self {
                Self { repository }
            }

            pub fn repository(&self) -> &StoreRepository<$entity> {
                &self.repository
            }
        }
    };
}

register_action!(RegisterProvince => Province);
register_action!(
    /// Needs the province attached.
    RegisterOrgUnit => OrgUnit
);
register_action!(
    /// The org unit is optional; plans without one are organization-wide.
    RegisterPlan => Plan
);
register_action!(
    /// Needs the owning org unit attached. Addresses are unique per org unit.
    RegisterProperty => Property
);
register_action!(
    /// Needs the property attached. Names are unique per property.
    RegisterWorkObject => WorkObject
);
register_action!(RegisterSpecialty => Specialty);
register_action!(RegisterUnitOfMeasure => UnitOfMeasure);
register_action!(
    /// Needs the unit of measure attached.
    RegisterMaterial => Material
);
register_action!(
    /// Needs plan, specialty and work object attached.
    RegisterConstructionAction => ConstructionAction
);

#[async_trait]
impl BusinessAction for RegisterProvince {
    type Command = ProvinceCommand;
    type Entity = Province;

    async fn execute(&self, command: &ProvinceCommand) -> Result<Province> {
        let province = Province {
            name: command.name.trim().to_string(),
            ..Default::default()
        };
        ensure_unique(&self.repository, &province).await?;
        Ok(province)
    }
}

#[async_trait]
impl BusinessAction for RegisterOrgUnit {
    type Command = OrgUnitCommand;
    type Entity = OrgUnit;

    async fn execute(&self, command: &OrgUnitCommand) -> Result<OrgUnit> {
        let org_unit = OrgUnit {
            name: command.name.trim().to_string(),
            province: Some(attached_id(&command.province, "province")?),
            ..Default::default()
        };
        ensure_unique(&self.repository, &org_unit).await?;
        Ok(org_unit)
    }
}

#[async_trait]
impl BusinessAction for RegisterPlan {
    type Command = PlanCommand;
    type Entity = Plan;

    async fn execute(&self, command: &PlanCommand) -> Result<Plan> {
        let org_unit = match &command.org_unit {
            Some(_) => Some(attached_id(&command.org_unit, "org unit")?),
            None => None,
        };

        let plan = Plan {
            year: command.year,
            budget: command.budget,
            plan_type: command.plan_type.as_deref().map(|t| t.trim().to_string()),
            org_unit,
            ..Default::default()
        };
        ensure_unique(&self.repository, &plan).await?;
        Ok(plan)
    }
}

#[async_trait]
impl BusinessAction for RegisterProperty {
    type Command = PropertyCommand;
    type Entity = Property;

    async fn execute(&self, command: &PropertyCommand) -> Result<Property> {
        let property = Property {
            address: command.address.trim().to_string(),
            org_unit: Some(attached_id(&command.org_unit, "org unit")?),
            ..Default::default()
        };
        ensure_unique(&self.repository, &property).await?;
        Ok(property)
    }
}

#[async_trait]
impl BusinessAction for RegisterWorkObject {
    type Command = WorkObjectCommand;
    type Entity = WorkObject;

    async fn execute(&self, command: &WorkObjectCommand) -> Result<WorkObject> {
        let work_object = WorkObject {
            name: command.name.trim().to_string(),
            property: Some(attached_id(&command.property, "property")?),
            ..Default::default()
        };
        ensure_unique(&self.repository, &work_object).await?;
        Ok(work_object)
    }
}

#[async_trait]
impl BusinessAction for RegisterSpecialty {
    type Command = SpecialtyCommand;
    type Entity = Specialty;

    async fn execute(&self, command: &SpecialtyCommand) -> Result<Specialty> {
        let specialty = Specialty {
            kind: command.kind.trim().to_string(),
            ..Default::default()
        };
        ensure_unique(&self.repository, &specialty).await?;
        Ok(specialty)
    }
}

#[async_trait]
impl BusinessAction for RegisterUnitOfMeasure {
    type Command = UnitOfMeasureCommand;
    type Entity = UnitOfMeasure;

    async fn execute(&self, command: &UnitOfMeasureCommand) -> Result<UnitOfMeasure> {
        let unit = UnitOfMeasure {
            name: command.name.trim().to_string(),
            ..Default::default()
        };
        ensure_unique(&self.repository, &unit).await?;
        Ok(unit)
    }
}

#[async_trait]
impl BusinessAction for RegisterMaterial {
    type Command = MaterialCommand;
    type Entity = Material;

    async fn execute(&self, command: &MaterialCommand) -> Result<Material> {
        let material = Material {
            name: command.name.trim().to_string(),
            unit_of_measure: Some(attached_id(&command.unit_of_measure, "unit of measure")?),
            ..Default::default()
        };
        ensure_unique(&self.repository, &material).await?;
        Ok(material)
    }
}

#[async_trait]
impl BusinessAction for RegisterConstructionAction {
    type Command = ConstructionActionCommand;
    type Entity = ConstructionAction;

    async fn execute(&self, command: &ConstructionActionCommand) -> Result<ConstructionAction> {
        Ok(ConstructionAction {
            name: command.name.trim().to_string(),
            unit_of_measure: command.unit_of_measure.trim().to_string(),
            cost: command.cost,
            plan: Some(attached_id(&command.plan, "plan")?),
            specialty: Some(attached_id(&command.specialty, "specialty")?),
            work_object: Some(attached_id(&command.work_object, "work object")?),
            ..Default::default()
        })
    }
}
