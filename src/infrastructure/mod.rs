//! Infrastructure layer - persistence adapters

pub mod database;
pub mod storage;

pub use database::repositories::SeaOrmStudentStore;
pub use database::{init_database, DatabaseConfig};
pub use storage::InMemoryStudentStore;
