use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Campaigns::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Campaigns::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Campaigns::Title).string().not_null())
          .col(ColumnDef::new(Campaigns::Description).text().null())
          .col(ColumnDef::new(Campaigns::BrandName).string().not_null())
          .col(ColumnDef::new(Campaigns::LogoUrl).string().null())
          .col(
            ColumnDef::new(Campaigns::BudgetTotal)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Campaigns::BudgetUsed)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Campaigns::RatePerMillion).big_integer().null(),
          )
          .col(ColumnDef::new(Campaigns::MaxSubmissions).integer().null())
          .col(
            ColumnDef::new(Campaigns::MaxEarningsPerCreator).big_integer().null(),
          )
          .col(
            ColumnDef::new(Campaigns::Platforms)
              .text()
              .not_null()
              .default("[]"),
          )
          .col(
            ColumnDef::new(Campaigns::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .col(ColumnDef::new(Campaigns::StartDate).date().null())
          .col(ColumnDef::new(Campaigns::EndDate).date().null())
          .col(ColumnDef::new(Campaigns::CreatedBy).integer().null())
          .col(ColumnDef::new(Campaigns::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Campaigns::UpdatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_campaigns_created_by")
              .from(Campaigns::Table, Campaigns::CreatedBy)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::SetNull),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_campaigns_status")
          .table(Campaigns::Table)
          .col(Campaigns::Status)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Campaigns::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Campaigns {
  Table,
  Id,
  Title,
  Description,
  BrandName,
  LogoUrl,
  BudgetTotal,
  BudgetUsed,
  RatePerMillion,
  MaxSubmissions,
  MaxEarningsPerCreator,
  Platforms,
  Status,
  StartDate,
  EndDate,
  CreatedBy,
  CreatedAt,
  UpdatedAt,
}
