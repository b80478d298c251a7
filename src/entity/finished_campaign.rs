use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::CampaignStatus;
use crate::money::Cents;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "finished_campaigns")]
pub struct Model {
  /// Id the campaign had while it was live
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: i32,
  pub title: String,
  #[sea_orm(column_type = "Text", nullable)]
  pub description: Option<String>,
  pub brand_name: String,
  pub logo_url: Option<String>,
  #[sea_orm(column_type = "BigInteger")]
  pub budget_total: Cents,
  #[sea_orm(column_type = "BigInteger")]
  pub budget_used: Cents,
  #[sea_orm(column_type = "BigInteger", nullable)]
  pub rate_per_million: Option<Cents>,
  pub max_submissions: Option<i32>,
  #[sea_orm(column_type = "BigInteger")]
  pub max_earnings_per_creator: Cents,
  #[sea_orm(column_type = "Text")]
  pub platforms: String,
  pub status: CampaignStatus,
  pub start_date: Option<Date>,
  pub end_date: Option<Date>,
  pub created_by: Option<i32>,
  pub created_at: DateTime,
  pub finished_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
