//! Live campaigns. Platforms are kept as a JSON text column and
//! normalized on every read (see `utils::platforms_from_str`).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::money::Cents;

#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  EnumIter,
  DeriveActiveEnum,
  Serialize,
  Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
  #[default]
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "paused")]
  Paused,
  #[sea_orm(string_value = "pending")]
  Pending,
  #[sea_orm(string_value = "completed")]
  Completed,
  #[sea_orm(string_value = "ended")]
  Ended,
}

impl CampaignStatus {
  pub fn parse(raw: &str) -> Option<Self> {
    match raw.trim().to_ascii_lowercase().as_str() {
      "active" => Some(Self::Active),
      "paused" => Some(Self::Paused),
      "pending" => Some(Self::Pending),
      "completed" => Some(Self::Completed),
      "ended" => Some(Self::Ended),
      _ => None,
    }
  }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "campaigns")]
pub struct Model {
  #[sea_orm(primary_key)]
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
  #[sea_orm(column_type = "BigInteger", nullable)]
  pub max_earnings_per_creator: Option<Cents>,
  #[sea_orm(column_type = "Text")]
  pub platforms: String,
  pub status: CampaignStatus,
  pub start_date: Option<Date>,
  pub end_date: Option<Date>,
  pub created_by: Option<i32>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::participation::Entity")]
  Participations,
  #[sea_orm(has_many = "super::submission::Entity")]
  Submissions,
}

impl Related<super::participation::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Participations.def()
  }
}

impl Related<super::submission::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Submissions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
