// ============================================================================
// Transaction Management Module
// ============================================================================
//
// Unit of work over the in-memory store: changes are staged in order and
// applied all at once on COMMIT, or dropped on ROLLBACK.
//
// ============================================================================

pub mod change;
pub mod state;
pub mod unit_of_work;

pub use change::Change;
pub use state::{Transaction, TransactionId, TransactionState};
pub use unit_of_work::UnitOfWork;
