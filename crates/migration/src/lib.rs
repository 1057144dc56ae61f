mod m20260801_000001_create_table_products;

use async_trait::async_trait;

pub use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            self::m20260801_000001_create_table_products::Migration,
        )]
    }
}
