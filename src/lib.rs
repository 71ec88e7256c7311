//! # Students Service
//!
//! Student registration records over a REST API: create, read, update,
//! delete, case-insensitive name search and offset pagination, backed by
//! PostgreSQL, MySQL, SQLite or an in-memory store.
//!
//! ## Architecture
//!
//! - **domain**: the `Student` entity and the `StudentStore` trait
//! - **application**: `StudentQueryRepository`, the single entry point for
//!   reads and writes (pagination, conflict rules, cache invalidation)
//! - **infrastructure**: SeaORM store with read cache, migrations, in-memory store
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: errors, pagination types, validators, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use application::StudentQueryRepository;
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStudentStore, SeaOrmStudentStore};
pub use interfaces::http::create_api_router;
