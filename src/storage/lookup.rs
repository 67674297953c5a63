use super::{Entity, Store};
use crate::core::EntityId;
use crate::domain::{
    Material, OrgUnit, Plan, Property, Province, Specialty, UnitOfMeasure, WorkObject,
};

/// Single-result-or-absent queries used to resolve references before a
/// command is run. Names compare case-insensitively, ignoring surrounding
/// whitespace.
#[derive(Clone)]
pub struct Lookup {
    store: Store,
}

impl Lookup {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn by_id<T: Entity>(&self, id: EntityId) -> Option<T> {
        self.store.find(id).await
    }

    pub async fn province_by_name(&self, name: &str) -> Option<Province> {
        self.first(|p: &Province| same_text(&p.name, name)).await
    }

    pub async fn org_unit_by_name(&self, name: &str) -> Option<OrgUnit> {
        self.first(|uo: &OrgUnit| same_text(&uo.name, name)).await
    }

    pub async fn specialty_by_kind(&self, kind: &str) -> Option<Specialty> {
        self.first(|s: &Specialty| same_text(&s.kind, kind)).await
    }

    pub async fn unit_of_measure_by_name(&self, name: &str) -> Option<UnitOfMeasure> {
        self.first(|u: &UnitOfMeasure| same_text(&u.name, name)).await
    }

    pub async fn material_by_name(&self, name: &str) -> Option<Material> {
        self.first(|m: &Material| same_text(&m.name, name)).await
    }

    pub async fn plan(
        &self,
        year: i32,
        plan_type: &str,
        org_unit: Option<EntityId>,
    ) -> Option<Plan> {
        self.first(|p: &Plan| {
            p.year == year
                && p.org_unit == org_unit
                && p.plan_type.as_deref().is_some_and(|t| same_text(t, plan_type))
        })
        .await
    }

    pub async fn property_by_address(&self, org_unit: EntityId, address: &str) -> Option<Property> {
        self.first(|p: &Property| p.org_unit == Some(org_unit) && same_text(&p.address, address))
            .await
    }

    pub async fn work_object_by_name(&self, property: EntityId, name: &str) -> Option<WorkObject> {
        self.first(|w: &WorkObject| w.property == Some(property) && same_text(&w.name, name))
            .await
    }

    async fn first<T: Entity>(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        let tables = self.store.snapshot().await;
        T::table(&tables).find_by(predicate).cloned()
    }
}

pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Repository, StoreRepository};

    #[tokio::test]
    async fn test_lookup_by_name_ignores_case() {
        let store = Store::new();
        let repo = StoreRepository::<OrgUnit>::new(store.clone());
        let mut uow = store.begin();
        let mut plaza = OrgUnit {
            name: "Plaza".into(),
            ..Default::default()
        };
        repo.add(&mut uow, &mut plaza).await.unwrap();
        uow.commit().await.unwrap();

        let lookup = Lookup::new(store);
        assert_eq!(lookup.org_unit_by_name(" plaza ").await, Some(plaza.clone()));
        assert!(lookup.org_unit_by_name("Cerro").await.is_none());
        assert_eq!(lookup.by_id::<OrgUnit>(plaza.id).await, Some(plaza));
    }

    #[tokio::test]
    async fn test_plan_lookup_matches_org_unit() {
        let store = Store::new();
        let repo = StoreRepository::<Plan>::new(store.clone());
        let mut uow = store.begin();
        let mut plan = Plan {
            year: 2024,
            plan_type: Some("Inversion".into()),
            org_unit: Some(3),
            ..Default::default()
        };
        repo.add(&mut uow, &mut plan).await.unwrap();
        uow.commit().await.unwrap();

        let lookup = Lookup::new(store);
        assert!(lookup.plan(2024, "inversion", Some(3)).await.is_some());
        assert!(lookup.plan(2024, "inversion", None).await.is_none());
        assert!(lookup.plan(2025, "inversion", Some(3)).await.is_none());
    }
}
