/// Service layer tests
///
/// End-to-end flows through `AdminService` and `InvestorService` sharing
/// one store: reference resolution, back-links, guarded updates, deletes.
/// Run with: cargo test --test service_tests

use investplan::domain::{
    ConstructionActionCommand, Material, MaterialCommand, OrgUnitCommand, Plan, PlanCommand,
    Property, PropertyCommand, ProvinceCommand, SpecialtyCommand, UnitOfMeasureCommand,
    WorkObject, WorkObjectCommand,
};
use investplan::{
    AdminService, BizError, EntityId, EntityKind, InvestorService, NO_IDENTITY, Store,
};
use std::sync::Arc;

struct Fixture {
    store: Store,
    admin: AdminService,
    investor: InvestorService,
}

impl Fixture {
    async fn new() -> Self {
        let store = Store::new();
        let admin = AdminService::new(store.clone());
        let investor = InvestorService::new(store.clone());

        admin
            .register_province(&ProvinceCommand {
                name: "Villa Clara".into(),
            })
            .await
            .unwrap();
        let org_unit = admin
            .register_org_unit(
                OrgUnitCommand {
                    name: "Empresa Constructora".into(),
                    ..Default::default()
                },
                "Villa Clara",
            )
            .await
            .unwrap();
        assert!(org_unit.is_registered());

        Self {
            store,
            admin,
            investor,
        }
    }

    async fn property(&self, address: &str) -> EntityId {
        self.investor
            .register_property(
                PropertyCommand {
                    address: address.into(),
                    ..Default::default()
                },
                "Empresa Constructora",
            )
            .await
            .unwrap()
            .id()
    }

    async fn work_object(&self, name: &str, address: &str) -> EntityId {
        self.investor
            .register_work_object(
                WorkObjectCommand {
                    name: name.into(),
                    ..Default::default()
                },
                "Empresa Constructora",
                address,
            )
            .await
            .unwrap()
            .id()
    }
}

#[tokio::test]
async fn test_register_plan_returns_id_or_sentinel() {
    let fx = Fixture::new().await;

    let ok = fx
        .investor
        .register_plan(&PlanCommand {
            year: 2026,
            budget: 300000.0,
            plan_type: Some("Inversion".into()),
            org_unit: None,
        })
        .await
        .unwrap();
    assert_eq!(ok.id(), 1);

    let rejected = fx
        .investor
        .register_plan(&PlanCommand::default())
        .await
        .unwrap();
    assert_eq!(rejected.id(), NO_IDENTITY);
    assert_eq!(rejected.errors().len(), 2);

    let plan = fx.investor.get_plan(2026, "inversion", None).await.unwrap();
    assert_eq!(plan.budget, 300000.0);
}

#[tokio::test]
async fn test_update_plan_fills_missing_fields_only() {
    let fx = Fixture::new().await;
    let id = fx
        .investor
        .register_plan(&PlanCommand {
            year: 2026,
            budget: 0.0,
            plan_type: Some("Mantenimiento".into()),
            org_unit: None,
        })
        .await
        .unwrap()
        .id();

    let merged = fx
        .investor
        .update_plan(
            &Plan {
                year: 2030,
                budget: 4500.0,
                ..Default::default()
            },
            id,
        )
        .await
        .unwrap();
    assert_eq!(merged.year, 2026);
    assert_eq!(merged.budget, 4500.0);

    let missing = fx.investor.update_plan(&Plan::default(), 99).await;
    assert!(matches!(
        missing,
        Err(BizError::TargetNotFound {
            kind: EntityKind::Plan,
            id: 99
        })
    ));
}

#[tokio::test]
async fn test_register_property_links_org_unit() {
    let fx = Fixture::new().await;
    assert!(!fx.investor.has_properties("Empresa Constructora").await.unwrap());

    let id = fx.property("Carretera Central km 4").await;
    assert!(id > 0);
    assert!(fx.investor.has_properties("empresa constructora").await.unwrap());

    assert!(matches!(
        fx.investor.has_properties("Otra").await,
        Err(BizError::MissingReference(_))
    ));
}

#[tokio::test]
async fn test_register_property_in_unknown_org_unit_is_fatal() {
    let fx = Fixture::new().await;
    let result = fx
        .investor
        .register_property(
            PropertyCommand {
                address: "Calle Real 1".into(),
                ..Default::default()
            },
            "No existe",
        )
        .await;
    assert!(matches!(result, Err(BizError::MissingReference(_))));
    assert_eq!(fx.store.row_count(EntityKind::Property).await, 0);
}

#[tokio::test]
async fn test_duplicate_property_address_is_fatal() {
    let fx = Fixture::new().await;
    fx.property("Calle Real 1").await;

    let result = fx
        .investor
        .register_property(
            PropertyCommand {
                address: "calle real 1".into(),
                ..Default::default()
            },
            "Empresa Constructora",
        )
        .await;
    assert!(matches!(result, Err(BizError::Duplicate(_))));
}

#[tokio::test]
async fn test_update_property_rejects_taken_address() {
    let fx = Fixture::new().await;
    fx.property("Calle Real 1").await;
    let second = fx.property("Calle Real 2").await;

    let result = fx
        .investor
        .update_property(
            &Property {
                address: "Calle Real 1".into(),
                ..Default::default()
            },
            second,
        )
        .await;
    assert!(matches!(result, Err(BizError::Duplicate(_))));

    let unchanged = fx
        .investor
        .update_property(
            &Property {
                address: "Calle Real 9".into(),
                ..Default::default()
            },
            second,
        )
        .await
        .unwrap();
    assert_eq!(unchanged.address, "Calle Real 2");
}

#[tokio::test]
async fn test_work_objects_attach_to_property() {
    let fx = Fixture::new().await;
    let property = fx.property("Avenida Norte 12").await;
    let first = fx.work_object("Nave 1", "Avenida Norte 12").await;
    let second = fx.work_object("Nave 2", "avenida norte 12").await;

    let stored: Property = fx.investor.lookup().by_id(property).await.unwrap();
    assert_eq!(stored.work_objects, vec![first, second]);

    let other = fx.property("Avenida Sur 3").await;
    let commits = fx.store.commit_count();
    let updated = fx
        .investor
        .attach_work_objects(other, &[first, second, first])
        .await
        .unwrap();
    assert_eq!(updated.work_objects, vec![first, second]);
    assert_eq!(fx.store.commit_count(), commits + 1);

    assert!(matches!(
        fx.investor.attach_work_objects(77, &[first]).await,
        Err(BizError::TargetNotFound {
            kind: EntityKind::Property,
            id: 77
        })
    ));

    assert!(matches!(
        fx.investor.attach_work_objects(other, &[500]).await,
        Err(BizError::TargetNotFound {
            kind: EntityKind::WorkObject,
            id: 500
        })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_registrations_keep_every_back_link() {
    let fx = Fixture::new().await;
    let investor = Arc::new(fx.investor);
    let commits = fx.store.commit_count();

    let mut handles = Vec::new();
    for i in 0..64 {
        let investor = Arc::clone(&investor);
        handles.push(tokio::spawn(async move {
            investor
                .register_property(
                    PropertyCommand {
                        address: format!("Calle {}", i),
                        ..Default::default()
                    },
                    "Empresa Constructora",
                )
                .await
                .unwrap()
                .id()
        }));
    }

    let mut registered = Vec::new();
    for handle in handles {
        registered.push(handle.await.unwrap());
    }
    registered.sort();

    let org_unit = investor
        .lookup()
        .org_unit_by_name("Empresa Constructora")
        .await
        .unwrap();
    let mut linked = org_unit.properties.clone();
    linked.sort();

    assert_eq!(linked, registered);
    assert_eq!(fx.store.row_count(EntityKind::Property).await, 64);
    assert_eq!(fx.store.commit_count(), commits + 64);
}

#[tokio::test]
async fn test_delete_work_object_unlinks_property() {
    let fx = Fixture::new().await;
    let property = fx.property("Avenida Norte 12").await;
    let first = fx.work_object("Nave 1", "Avenida Norte 12").await;
    let second = fx.work_object("Nave 2", "Avenida Norte 12").await;

    let removed = fx.investor.delete_work_object(first).await.unwrap();
    assert_eq!(removed.name, "Nave 1");
    assert_eq!(removed.property, Some(property));

    let stored: Property = fx.investor.lookup().by_id(property).await.unwrap();
    assert_eq!(stored.work_objects, vec![second]);
    assert!(fx.investor.lookup().by_id::<WorkObject>(first).await.is_none());

    assert!(matches!(
        fx.investor.delete_work_object(first).await,
        Err(BizError::TargetNotFound {
            kind: EntityKind::WorkObject,
            ..
        })
    ));
}

#[tokio::test]
async fn test_update_work_object_rejects_taken_name() {
    let fx = Fixture::new().await;
    fx.property("Avenida Norte 12").await;
    fx.work_object("Nave 1", "Avenida Norte 12").await;
    let second = fx.work_object("Nave 2", "Avenida Norte 12").await;

    let result = fx
        .investor
        .update_work_object(
            &WorkObject {
                name: "nave 1".into(),
                ..Default::default()
            },
            second,
        )
        .await;
    assert!(matches!(result, Err(BizError::Duplicate(_))));
}

#[tokio::test]
async fn test_construction_action_appended_to_plan() {
    let fx = Fixture::new().await;
    fx.property("Avenida Norte 12").await;
    let work_object = fx.work_object("Nave 1", "Avenida Norte 12").await;
    fx.investor
        .register_specialty(&SpecialtyCommand {
            kind: "Albanileria".into(),
        })
        .await
        .unwrap();
    let plan = fx
        .investor
        .register_plan(&PlanCommand {
            year: 2026,
            budget: 10000.0,
            plan_type: Some("Reparacion".into()),
            org_unit: None,
        })
        .await
        .unwrap()
        .id();

    let registration = fx
        .investor
        .register_construction_action(ConstructionActionCommand {
            name: "Reparar cubierta".into(),
            unit_of_measure: "m2".into(),
            cost: 2500.0,
            plan_id: plan,
            specialty_kind: "albanileria".into(),
            work_object_id: work_object,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(registration.is_registered());

    let stored: Plan = fx.investor.lookup().by_id(plan).await.unwrap();
    assert_eq!(stored.construction_actions, vec![registration.id()]);

    let unknown_plan = fx
        .investor
        .register_construction_action(ConstructionActionCommand {
            name: "Pintar fachada".into(),
            unit_of_measure: "m2".into(),
            cost: 100.0,
            plan_id: 42,
            specialty_kind: "Albanileria".into(),
            work_object_id: work_object,
            ..Default::default()
        })
        .await;
    assert!(matches!(unknown_plan, Err(BizError::MissingReference(_))));
}

#[tokio::test]
async fn test_material_lifecycle() {
    let fx = Fixture::new().await;
    fx.investor
        .register_unit_of_measure(&UnitOfMeasureCommand { name: "t".into() })
        .await
        .unwrap();

    let id = fx
        .investor
        .register_material(
            MaterialCommand {
                name: "Acero".into(),
                ..Default::default()
            },
            "t",
        )
        .await
        .unwrap()
        .id();

    let updated = fx
        .investor
        .update_material(
            &Material {
                name: "Acero corrugado".into(),
                ..Default::default()
            },
            id,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Acero");

    let other = fx
        .investor
        .register_material(
            MaterialCommand {
                name: "Cemento".into(),
                ..Default::default()
            },
            "t",
        )
        .await
        .unwrap()
        .id();
    assert!(matches!(
        fx.investor
            .update_material(
                &Material {
                    name: "acero".into(),
                    ..Default::default()
                },
                other,
            )
            .await,
        Err(BizError::Duplicate(_))
    ));

    let removed = fx.investor.delete_material(id).await.unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(fx.admin.list(EntityKind::Material).await.len(), 1);

    assert!(matches!(
        fx.investor.delete_material(id).await,
        Err(BizError::TargetNotFound { .. })
    ));
}

#[tokio::test]
async fn test_catalog_deletes() {
    let fx = Fixture::new().await;
    let unit = fx
        .investor
        .register_unit_of_measure(&UnitOfMeasureCommand { name: "kg".into() })
        .await
        .unwrap()
        .id();
    let specialty = fx
        .investor
        .register_specialty(&SpecialtyCommand {
            kind: "Electrica".into(),
        })
        .await
        .unwrap()
        .id();

    fx.investor.delete_unit_of_measure(unit).await.unwrap();
    fx.investor.delete_specialty(specialty).await.unwrap();
    assert_eq!(fx.store.row_count(EntityKind::UnitOfMeasure).await, 0);
    assert_eq!(fx.store.row_count(EntityKind::Specialty).await, 0);

    fx.admin.delete_province(1).await.unwrap();
    assert!(matches!(
        fx.admin.delete_province(1).await,
        Err(BizError::TargetNotFound {
            kind: EntityKind::Province,
            id: 1
        })
    ));
}
