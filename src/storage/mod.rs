pub mod catalog;
pub mod lookup;
pub mod memory;
pub mod repository;
pub mod table;

pub use catalog::{Entity, Record, Tables};
pub use lookup::Lookup;
pub use memory::Store;
pub use repository::{Repository, StoreRepository};
pub use table::Table;
