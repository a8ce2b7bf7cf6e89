//! Database migrations for the Casting API.
//!
//! One migration per table, applied in dependency order so foreign keys
//! always reference a table that already exists.

pub use sea_orm_migration::prelude::*;

mod m2024_01_01_000001_create_tenants;
mod m2024_01_01_000002_create_users;
mod m2024_01_01_000003_create_studios;
mod m2024_01_01_000004_create_profiles;
mod m2024_01_01_000005_create_casting_calls;
mod m2024_01_01_000006_create_applications;
mod m2024_01_01_000007_create_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2024_01_01_000001_create_tenants::Migration),
            Box::new(m2024_01_01_000002_create_users::Migration),
            Box::new(m2024_01_01_000003_create_studios::Migration),
            Box::new(m2024_01_01_000004_create_profiles::Migration),
            Box::new(m2024_01_01_000005_create_casting_calls::Migration),
            Box::new(m2024_01_01_000006_create_applications::Migration),
            Box::new(m2024_01_01_000007_create_messages::Migration),
        ]
    }
}
