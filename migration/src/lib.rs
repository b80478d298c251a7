//! Schema migrations for the CreatorPulse store

pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_users;
mod m20261019_000002_create_campaigns;
mod m20261019_000003_create_finished_campaigns;
mod m20261019_000004_create_user_campaigns;
mod m20261019_000005_create_submissions;
mod m20261019_000006_create_connected_accounts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20261019_000001_create_users::Migration),
      Box::new(m20261019_000002_create_campaigns::Migration),
      Box::new(m20261019_000003_create_finished_campaigns::Migration),
      Box::new(m20261019_000004_create_user_campaigns::Migration),
      Box::new(m20261019_000005_create_submissions::Migration),
      Box::new(m20261019_000006_create_connected_accounts::Migration),
    ]
  }
}
