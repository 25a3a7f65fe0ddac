pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use repository::{Record, Repository};
pub use store::{Store, StoreError, TableSpec};
