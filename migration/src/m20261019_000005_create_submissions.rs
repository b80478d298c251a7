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
          .table(Submissions::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Submissions::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Submissions::CampaignId).integer().not_null())
          .col(ColumnDef::new(Submissions::UserId).integer().not_null())
          .col(ColumnDef::new(Submissions::Accounts).json().not_null())
          .col(ColumnDef::new(Submissions::ReelUrl).string().not_null())
          .col(ColumnDef::new(Submissions::Metadata).json().null())
          .col(
            ColumnDef::new(Submissions::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(
            ColumnDef::new(Submissions::Earnings)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(Submissions::Views)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(Submissions::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Submissions::ReviewedAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_submissions_user")
              .from(Submissions::Table, Submissions::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_submissions_campaign_user")
          .table(Submissions::Table)
          .col(Submissions::CampaignId)
          .col(Submissions::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Submissions::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum Submissions {
  Table,
  Id,
  CampaignId,
  UserId,
  Accounts,
  ReelUrl,
  Metadata,
  Status,
  Earnings,
  Views,
  CreatedAt,
  ReviewedAt,
}
