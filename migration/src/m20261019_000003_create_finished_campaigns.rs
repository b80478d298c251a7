use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // Archived rows keep the id they had while live.
    manager
      .create_table(
        Table::create()
          .table(FinishedCampaigns::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(FinishedCampaigns::Id)
              .integer()
              .not_null()
              .primary_key(),
          )
          .col(ColumnDef::new(FinishedCampaigns::Title).string().not_null())
          .col(ColumnDef::new(FinishedCampaigns::Description).text().null())
          .col(ColumnDef::new(FinishedCampaigns::BrandName).string().not_null())
          .col(ColumnDef::new(FinishedCampaigns::LogoUrl).string().null())
          .col(
            ColumnDef::new(FinishedCampaigns::BudgetTotal)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(FinishedCampaigns::BudgetUsed).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(FinishedCampaigns::RatePerMillion).big_integer().null(),
          )
          .col(
            ColumnDef::new(FinishedCampaigns::MaxSubmissions).integer().null(),
          )
          .col(
            ColumnDef::new(FinishedCampaigns::MaxEarningsPerCreator)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(ColumnDef::new(FinishedCampaigns::Platforms).text().not_null())
          .col(ColumnDef::new(FinishedCampaigns::Status).string().not_null())
          .col(ColumnDef::new(FinishedCampaigns::StartDate).date().null())
          .col(ColumnDef::new(FinishedCampaigns::EndDate).date().null())
          .col(ColumnDef::new(FinishedCampaigns::CreatedBy).integer().null())
          .col(
            ColumnDef::new(FinishedCampaigns::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(FinishedCampaigns::FinishedAt)
              .date_time()
              .not_null(),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(FinishedCampaigns::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum FinishedCampaigns {
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
  FinishedAt,
}
