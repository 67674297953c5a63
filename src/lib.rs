// ============================================================================
// investplan Library
// ============================================================================
//
// Business-action pipeline of the investment-planning backend: commands are
// validated, turned into entities by business actions and committed through
// a unit of work over an in-memory transactional store.
//
// ============================================================================

pub mod action;
pub mod config;
pub mod core;
pub mod domain;
pub mod merge;
pub mod runner;
pub mod service;
pub mod storage;
pub mod transaction;
pub mod validation;

// Re-export main types for convenience
pub use action::BusinessAction;
pub use config::StoreConfig;
pub use core::{BizError, EntityId, EntityKind, NO_IDENTITY, Result};
pub use merge::{Merge, MergeResolver, merge};
pub use runner::{ActionRunner, RunOutcome, RunState};
pub use service::{AdminService, InvestorService, Registration};
pub use storage::{Entity, Lookup, Record, Repository, Store, StoreRepository};
pub use transaction::{Change, UnitOfWork};
pub use validation::{Validate, ValidationResult, Validator, Violation, validate};
