//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20240601_000001_create_campaign_tables;
mod m20240601_000002_create_forum_tables;
mod m20240601_000003_create_open_trip_tables;
mod m20240601_000004_create_tourism_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_campaign_tables::Migration),
            Box::new(m20240601_000002_create_forum_tables::Migration),
            Box::new(m20240601_000003_create_open_trip_tables::Migration),
            Box::new(m20240601_000004_create_tourism_tables::Migration),
        ]
    }
}
