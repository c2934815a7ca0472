//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250417_000001_create_users_and_roles;
mod m20250417_000002_create_eav_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250417_000001_create_users_and_roles::Migration),
            Box::new(m20250417_000002_create_eav_tables::Migration),
        ]
    }
}
