use super::{Registration, delete, merge_and_commit};
use crate::action::{
    BusinessAction, RegisterConstructionAction, RegisterMaterial, RegisterPlan,
    RegisterProperty, RegisterSpecialty, RegisterUnitOfMeasure, RegisterWorkObject,
};
use crate::core::{BizError, EntityId, EntityKind, Result};
use crate::domain::{
    ConstructionActionCommand, Material, MaterialCommand, Plan, PlanCommand, Property,
    PropertyCommand, Specialty, SpecialtyCommand, UnitOfMeasure, UnitOfMeasureCommand,
    WorkObject, WorkObjectCommand,
};
use crate::runner::{ActionRunner, RunOutcome};
use crate::storage::lookup::same_text;
use crate::storage::{Lookup, Store, StoreRepository};
use crate::transaction::Change;
use log::info;

/// Planning operations of an investor: plans, properties, work objects,
/// construction actions and the catalogs they draw on.
pub struct InvestorService {
    store: Store,
    lookup: Lookup,
    plans: ActionRunner<RegisterPlan>,
    properties: ActionRunner<RegisterProperty>,
    work_objects: ActionRunner<RegisterWorkObject>,
    construction_actions: ActionRunner<RegisterConstructionAction>,
    materials: ActionRunner<RegisterMaterial>,
    units_of_measure: ActionRunner<RegisterUnitOfMeasure>,
    specialties: ActionRunner<RegisterSpecialty>,
}

impl InvestorService {
    pub fn new(store: Store) -> Self {
        Self {
            lookup: Lookup::new(store.clone()),
            plans: runner(&store, RegisterPlan::new),
            properties: runner(&store, RegisterProperty::new).linking_owner(),
            work_objects: runner(&store, RegisterWorkObject::new).linking_owner(),
            construction_actions: runner(&store, RegisterConstructionAction::new).linking_owner(),
            materials: runner(&store, RegisterMaterial::new),
            units_of_measure: runner(&store, RegisterUnitOfMeasure::new),
            specialties: runner(&store, RegisterSpecialty::new),
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    // ------------------------------------------------------------------
    // Plans
    // ------------------------------------------------------------------

    /// The org unit, if any, must already be attached to `cmd`.
    pub async fn register_plan(&self, cmd: &PlanCommand) -> Result<Registration> {
        Ok(self.plans.run(cmd).await?.into())
    }

    pub async fn get_plan(
        &self,
        year: i32,
        plan_type: &str,
        org_unit: Option<EntityId>,
    ) -> Option<Plan> {
        self.lookup.plan(year, plan_type, org_unit).await
    }

    pub async fn update_plan(&self, update: &Plan, target_id: EntityId) -> Result<Plan> {
        merge_and_commit(&self.store, target_id, update).await
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// Register a property under the org unit named `org_unit_name`.
    ///
    /// An unknown org unit surfaces as `MissingReference` once the command
    /// has passed validation. The org unit's property list gains the new id
    /// in the same commit.
    pub async fn register_property(
        &self,
        mut cmd: PropertyCommand,
        org_unit_name: &str,
    ) -> Result<Registration> {
        cmd.org_unit = self.lookup.org_unit_by_name(org_unit_name).await;

        let outcome = self.properties.run(&cmd).await?;
        if let RunOutcome::Committed(property) = &outcome {
            info!("property {} registered under '{}'", property.id, org_unit_name);
        }
        Ok(outcome.into())
    }

    /// # Errors
    /// `Duplicate` when `update` carries a new address already used by
    /// another property of the same org unit.
    pub async fn update_property(
        &self,
        update: &Property,
        target_id: EntityId,
    ) -> Result<Property> {
        let existing: Property = self
            .lookup
            .by_id(target_id)
            .await
            .ok_or_else(|| BizError::not_found(EntityKind::Property, target_id))?;

        let address = update.address.trim();
        if !address.is_empty() && !same_text(address, &existing.address) {
            if let Some(org_unit) = existing.org_unit {
                let clash = self.lookup.property_by_address(org_unit, address).await;
                if clash.is_some_and(|other| other.id != target_id) {
                    return Err(BizError::Duplicate(format!(
                        "a property with address '{}' already exists",
                        address
                    )));
                }
            }
        }

        merge_and_commit(&self.store, target_id, update).await
    }

    /// # Errors
    /// `MissingReference` when no org unit is named `org_unit_name`.
    pub async fn has_properties(&self, org_unit_name: &str) -> Result<bool> {
        let org_unit = self
            .lookup
            .org_unit_by_name(org_unit_name)
            .await
            .ok_or_else(|| {
                BizError::MissingReference(format!("org unit '{}' does not exist", org_unit_name))
            })?;
        Ok(!org_unit.properties.is_empty())
    }

    /// Append already registered work objects to a property, in one commit.
    /// Ids the property already lists are skipped.
    pub async fn attach_work_objects(
        &self,
        property_id: EntityId,
        work_object_ids: &[EntityId],
    ) -> Result<Property> {
        for &id in work_object_ids {
            if self.lookup.by_id::<WorkObject>(id).await.is_none() {
                return Err(BizError::not_found(EntityKind::WorkObject, id));
            }
        }

        let mut uow = self.store.begin();
        for &child in work_object_ids {
            uow.stage(Change::Link {
                kind: EntityKind::Property,
                id: property_id,
                child,
            })?;
        }
        uow.commit().await?;

        self.lookup
            .by_id(property_id)
            .await
            .ok_or_else(|| BizError::not_found(EntityKind::Property, property_id))
    }

    // ------------------------------------------------------------------
    // Work objects
    // ------------------------------------------------------------------

    /// Register a work object on the property at `address` of org unit
    /// `org_unit_name`. The property's work object list gains the new id in
    /// the same commit.
    pub async fn register_work_object(
        &self,
        mut cmd: WorkObjectCommand,
        org_unit_name: &str,
        address: &str,
    ) -> Result<Registration> {
        cmd.property = match self.lookup.org_unit_by_name(org_unit_name).await {
            Some(org_unit) => self.lookup.property_by_address(org_unit.id, address).await,
            None => None,
        };

        Ok(self.work_objects.run(&cmd).await?.into())
    }

    /// # Errors
    /// `Duplicate` when `update` carries a new name already used on the same
    /// property.
    pub async fn update_work_object(
        &self,
        update: &WorkObject,
        target_id: EntityId,
    ) -> Result<WorkObject> {
        let existing: WorkObject = self
            .lookup
            .by_id(target_id)
            .await
            .ok_or_else(|| BizError::not_found(EntityKind::WorkObject, target_id))?;

        let name = update.name.trim();
        if !name.is_empty() && !same_text(name, &existing.name) {
            if let Some(property) = existing.property {
                let clash = self.lookup.work_object_by_name(property, name).await;
                if clash.is_some_and(|other| other.id != target_id) {
                    return Err(BizError::Duplicate(format!(
                        "a work object named '{}' already exists",
                        name
                    )));
                }
            }
        }

        merge_and_commit(&self.store, target_id, update).await
    }

    /// Remove a work object and drop it from its property's list.
    pub async fn delete_work_object(&self, id: EntityId) -> Result<WorkObject> {
        delete(&self.store, id).await
    }

    // ------------------------------------------------------------------
    // Construction actions
    // ------------------------------------------------------------------

    /// Resolves plan and work object by id and specialty by kind. The plan's
    /// action list gains the new id in the same commit.
    pub async fn register_construction_action(
        &self,
        mut cmd: ConstructionActionCommand,
    ) -> Result<Registration> {
        cmd.plan = self.lookup.by_id(cmd.plan_id).await;
        cmd.specialty = self.lookup.specialty_by_kind(&cmd.specialty_kind).await;
        cmd.work_object = self.lookup.by_id(cmd.work_object_id).await;

        Ok(self.construction_actions.run(&cmd).await?.into())
    }

    // ------------------------------------------------------------------
    // Catalogs
    // ------------------------------------------------------------------

    /// Register a material measured in the unit named `unit_of_measure`.
    pub async fn register_material(
        &self,
        mut cmd: MaterialCommand,
        unit_of_measure: &str,
    ) -> Result<Registration> {
        cmd.unit_of_measure = self.lookup.unit_of_measure_by_name(unit_of_measure).await;
        Ok(self.materials.run(&cmd).await?.into())
    }

    /// # Errors
    /// `Duplicate` when `update` carries a name another material already has.
    pub async fn update_material(
        &self,
        update: &Material,
        target_id: EntityId,
    ) -> Result<Material> {
        let name = update.name.trim();
        if !name.is_empty() {
            let clash = self.lookup.material_by_name(name).await;
            if clash.is_some_and(|other| other.id != target_id) {
                return Err(BizError::Duplicate(format!(
                    "a material named '{}' already exists",
                    name
                )));
            }
        }

        merge_and_commit(&self.store, target_id, update).await
    }

    pub async fn delete_material(&self, id: EntityId) -> Result<Material> {
        delete(&self.store, id).await
    }

    pub async fn register_unit_of_measure(
        &self,
        cmd: &UnitOfMeasureCommand,
    ) -> Result<Registration> {
        Ok(self.units_of_measure.run(cmd).await?.into())
    }

    pub async fn delete_unit_of_measure(&self, id: EntityId) -> Result<UnitOfMeasure> {
        delete(&self.store, id).await
    }

    pub async fn register_specialty(&self, cmd: &SpecialtyCommand) -> Result<Registration> {
        Ok(self.specialties.run(cmd).await?.into())
    }

    pub async fn delete_specialty(&self, id: EntityId) -> Result<Specialty> {
        delete(&self.store, id).await
    }
}

fn runner<A: BusinessAction>(
    store: &Store,
    action: impl FnOnce(StoreRepository<A::Entity>) -> A,
) -> ActionRunner<A> {
    ActionRunner::with_store(store.clone(), action(StoreRepository::new(store.clone())))
}
