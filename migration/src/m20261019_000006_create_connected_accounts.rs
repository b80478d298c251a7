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
          .table(ConnectedAccounts::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(ConnectedAccounts::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(ConnectedAccounts::UserId).integer().not_null())
          .col(ColumnDef::new(ConnectedAccounts::Platform).string().not_null())
          .col(ColumnDef::new(ConnectedAccounts::Username).string().not_null())
          .col(ColumnDef::new(ConnectedAccounts::ProfileUrl).string().not_null())
          .col(
            ColumnDef::new(ConnectedAccounts::FollowersCount)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(ConnectedAccounts::EngagementRate).double().null())
          .col(
            ColumnDef::new(ConnectedAccounts::LastSyncedAt).date_time().null(),
          )
          .col(
            ColumnDef::new(ConnectedAccounts::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(
            ColumnDef::new(ConnectedAccounts::VerificationCode)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(ConnectedAccounts::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(ConnectedAccounts::UpdatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_connected_accounts_user")
              .from(ConnectedAccounts::Table, ConnectedAccounts::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // upsert target
    manager
      .create_index(
        Index::create()
          .name("idx_connected_accounts_user_platform")
          .table(ConnectedAccounts::Table)
          .col(ConnectedAccounts::UserId)
          .col(ConnectedAccounts::Platform)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ConnectedAccounts::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum ConnectedAccounts {
  Table,
  Id,
  UserId,
  Platform,
  Username,
  ProfileUrl,
  FollowersCount,
  EngagementRate,
  LastSyncedAt,
  Status,
  VerificationCode,
  CreatedAt,
  UpdatedAt,
}
