use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  #[sea_orm(unique)]
  pub email: String,
  pub username: Option<String>,
  pub full_name: Option<String>,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub is_active: bool,
  pub is_admin: bool,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "super::participation::Entity")]
  Participations,
  #[sea_orm(has_many = "super::submission::Entity")]
  Submissions,
  #[sea_orm(has_many = "super::connected_account::Entity")]
  ConnectedAccounts,
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

impl Related<super::connected_account::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ConnectedAccounts.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
