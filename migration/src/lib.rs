pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260614_000001_links_table;
mod m20260614_000002_clicks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260614_000001_links_table::Migration),
            Box::new(m20260614_000002_clicks_table::Migration),
        ]
    }
}
