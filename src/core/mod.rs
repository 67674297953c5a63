pub mod error;
pub mod types;

pub use error::{BizError, Result};
pub use types::{EntityId, EntityKind, NO_IDENTITY, UNASSIGNED};
