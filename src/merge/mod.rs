//! Merge-Update Resolver
//!
//! Folds a partial update into an already persisted entity. The persisted
//! entity is the source of truth: a scalar or reference keeps its persisted
//! value unless that value is the type's zero value ("", 0, `None`), in
//! which case the update's value fills it in. Collections are additive: the
//! update's items come first, followed by the persisted items, without
//! de-duplication. The identity is always the persisted one.
//!
//! A zero value in the *update* is indistinguishable from "not supplied".
//! Callers cannot use a merge to reset a field to zero.

mod resolver;

pub use resolver::MergeResolver;

use crate::domain::{
    ConstructionAction, Material, OrgUnit, Plan, Property, Province, Specialty, UnitOfMeasure,
    WorkObject,
};

/// Types with a distinguished zero / empty value.
pub trait ZeroValue {
    fn is_zero(&self) -> bool;
}

impl ZeroValue for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ZeroValue for i32 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl ZeroValue for i64 {
    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl ZeroValue for f64 {
    fn is_zero(&self) -> bool {
        *self == 0.0
    }
}

impl<T: ZeroValue> ZeroValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.as_ref().is_none_or(ZeroValue::is_zero)
    }
}

/// Persisted value wins unless it is zero.
pub fn scalar<T: ZeroValue + Clone>(existing: &T, update: &T) -> T {
    if existing.is_zero() {
        update.clone()
    } else {
        existing.clone()
    }
}

/// Persisted reference wins unless it is unset or empty.
pub fn reference<T: ZeroValue + Clone>(existing: &Option<T>, update: &Option<T>) -> Option<T> {
    scalar(existing, update)
}

/// Update items first, then persisted items.
pub fn collection<T: Clone>(existing: &[T], update: &[T]) -> Vec<T> {
    if update.is_empty() {
        return existing.to_vec();
    }
    update.iter().chain(existing).cloned().collect()
}

/// Field-by-field merge of a partial update into a persisted entity.
pub trait Merge: Sized {
    fn merge(existing: &Self, update: &Self) -> Self;
}

/// Merge `update` into `existing`, see [`Merge`].
pub fn merge<T: Merge>(existing: &T, update: &T) -> T {
    T::merge(existing, update)
}

impl Merge for Province {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
        }
    }
}

impl Merge for OrgUnit {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
            province: reference(&existing.province, &update.province),
            properties: collection(&existing.properties, &update.properties),
        }
    }
}

impl Merge for Plan {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            year: scalar(&existing.year, &update.year),
            budget: scalar(&existing.budget, &update.budget),
            plan_type: reference(&existing.plan_type, &update.plan_type),
            org_unit: reference(&existing.org_unit, &update.org_unit),
            construction_actions: collection(
                &existing.construction_actions,
                &update.construction_actions,
            ),
        }
    }
}

impl Merge for Property {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            address: scalar(&existing.address, &update.address),
            org_unit: reference(&existing.org_unit, &update.org_unit),
            work_objects: collection(&existing.work_objects, &update.work_objects),
        }
    }
}

impl Merge for WorkObject {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
            property: reference(&existing.property, &update.property),
        }
    }
}

impl Merge for Specialty {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            kind: scalar(&existing.kind, &update.kind),
        }
    }
}

impl Merge for UnitOfMeasure {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
        }
    }
}

impl Merge for Material {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
            unit_of_measure: reference(&existing.unit_of_measure, &update.unit_of_measure),
        }
    }
}

impl Merge for ConstructionAction {
    fn merge(existing: &Self, update: &Self) -> Self {
        Self {
            id: existing.id,
            name: scalar(&existing.name, &update.name),
            unit_of_measure: scalar(&existing.unit_of_measure, &update.unit_of_measure),
            cost: scalar(&existing.cost, &update.cost),
            plan: reference(&existing.plan, &update.plan),
            specialty: reference(&existing.specialty, &update.specialty),
            work_object: reference(&existing.work_object, &update.work_object),
        }
    }
}
