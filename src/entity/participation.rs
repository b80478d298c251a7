//! Participation - a creator that joined a campaign

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

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
pub enum ParticipationStatus {
  #[default]
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "inactive")]
  Inactive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_campaigns")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub campaign_id: i32,
  #[sea_orm(primary_key, auto_increment = false)]
  pub user_id: i32,
  pub joined_at: DateTime,
  pub status: ParticipationStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::campaign::Entity",
    from = "Column::CampaignId",
    to = "super::campaign::Column::Id"
  )]
  Campaign,
  #[sea_orm(
    belongs_to = "super::user::Entity",
    from = "Column::UserId",
    to = "super::user::Column::Id"
  )]
  User,
}

impl Related<super::campaign::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Campaign.def()
  }
}

impl Related<super::user::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::User.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
