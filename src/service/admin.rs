use super::{Registration, delete};
use crate::action::{RegisterOrgUnit, RegisterProvince};
use crate::core::{EntityId, EntityKind, Result};
use crate::domain::{OrgUnit, OrgUnitCommand, Province, ProvinceCommand};
use crate::runner::ActionRunner;
use crate::storage::{Lookup, Record, Store, StoreRepository};

/// Administration of provinces and org units
pub struct AdminService {
    store: Store,
    lookup: Lookup,
    provinces: ActionRunner<RegisterProvince>,
    org_units: ActionRunner<RegisterOrgUnit>,
}

impl AdminService {
    pub fn new(store: Store) -> Self {
        Self {
            lookup: Lookup::new(store.clone()),
            provinces: ActionRunner::with_store(
                store.clone(),
                RegisterProvince::new(StoreRepository::new(store.clone())),
            ),
            org_units: ActionRunner::with_store(
                store.clone(),
                RegisterOrgUnit::new(StoreRepository::new(store.clone())),
            ),
            store,
        }
    }

    pub async fn register_province(&self, cmd: &ProvinceCommand) -> Result<Registration> {
        Ok(self.provinces.run(cmd).await?.into())
    }

    pub async fn delete_province(&self, id: EntityId) -> Result<Province> {
        delete(&self.store, id).await
    }

    /// Register an org unit in the province named `province_name`.
    pub async fn register_org_unit(
        &self,
        mut cmd: OrgUnitCommand,
        province_name: &str,
    ) -> Result<Registration> {
        cmd.province = self.lookup.province_by_name(province_name).await;
        Ok(self.org_units.run(&cmd).await?.into())
    }

    pub async fn delete_org_unit(&self, id: EntityId) -> Result<OrgUnit> {
        delete(&self.store, id).await
    }

    /// Every committed row of `kind`
    pub async fn list(&self, kind: EntityKind) -> Vec<Record> {
        self.store.fetch(kind).await
    }
}
