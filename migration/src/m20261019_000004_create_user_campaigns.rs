use sea_orm_migration::prelude::*;

use super::m20261019_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // No foreign key to campaigns: participation outlives archival.
    manager
      .create_table(
        Table::create()
          .table(UserCampaigns::Table)
          .if_not_exists()
          .col(ColumnDef::new(UserCampaigns::CampaignId).integer().not_null())
          .col(ColumnDef::new(UserCampaigns::UserId).integer().not_null())
          .col(ColumnDef::new(UserCampaigns::JoinedAt).date_time().not_null())
          .col(
            ColumnDef::new(UserCampaigns::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .primary_key(
            Index::create()
              .col(UserCampaigns::CampaignId)
              .col(UserCampaigns::UserId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_user_campaigns_user")
              .from(UserCampaigns::Table, UserCampaigns::UserId)
              .to(Users::Table, Users::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_user_campaigns_user")
          .table(UserCampaigns::Table)
          .col(UserCampaigns::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(UserCampaigns::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum UserCampaigns {
  Table,
  CampaignId,
  UserId,
  JoinedAt,
  Status,
}
