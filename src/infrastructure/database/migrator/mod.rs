//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_students;
mod m20240601_000002_add_name_search;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_students::Migration),
            Box::new(m20240601_000002_add_name_search::Migration),
        ]
    }
}
