//! Wire types shared by services and handlers

use json::Value;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  entity::{
    AccountStatus, CampaignStatus, ParticipationStatus, campaign,
    finished_campaign,
  },
  money::Cents,
  prelude::*,
};

/// Campaign payload for create and update.
///
/// Every field is kept as raw JSON so numbers may arrive as strings and
/// platforms in any of the accepted shapes. On update an absent field
/// keeps the stored value while an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CampaignReq {
  #[serde(deserialize_with = "utils::present")]
  pub title: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub description: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub brand_name: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub logo_url: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub budget_total: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub budget_used: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub rate_per_million: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub max_submissions: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub max_earnings_per_creator: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub platforms: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub status: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub start_date: Option<Value>,
  #[serde(deserialize_with = "utils::present")]
  pub end_date: Option<Value>,
}

/// Normalized campaign as every client sees it: platforms always a list,
/// money always numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignView {
  pub id: i32,
  pub title: String,
  pub description: Option<String>,
  pub brand_name: String,
  pub logo_url: Option<String>,
  pub budget_total: Cents,
  pub budget_used: Cents,
  pub rate_per_million: Option<Cents>,
  pub max_submissions: Option<i32>,
  pub max_earnings_per_creator: Option<Cents>,
  pub platforms: Vec<String>,
  pub status: CampaignStatus,
  pub start_date: Option<Date>,
  pub end_date: Option<Date>,
  pub created_by: Option<i32>,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

impl From<campaign::Model> for CampaignView {
  fn from(model: campaign::Model) -> Self {
    Self {
      platforms: utils::platforms_from_str(&model.platforms),
      id: model.id,
      title: model.title,
      description: model.description,
      brand_name: model.brand_name,
      logo_url: model.logo_url,
      budget_total: model.budget_total,
      budget_used: model.budget_used,
      rate_per_million: model.rate_per_million,
      max_submissions: model.max_submissions,
      max_earnings_per_creator: model.max_earnings_per_creator,
      status: model.status,
      start_date: model.start_date,
      end_date: model.end_date,
      created_by: model.created_by,
      created_at: model.created_at,
      updated_at: model.updated_at,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishedView {
  pub id: i32,
  pub title: String,
  pub description: Option<String>,
  pub brand_name: String,
  pub logo_url: Option<String>,
  pub budget_total: Cents,
  pub budget_used: Cents,
  pub rate_per_million: Option<Cents>,
  pub max_submissions: Option<i32>,
  pub max_earnings_per_creator: Cents,
  pub platforms: Vec<String>,
  pub status: CampaignStatus,
  pub start_date: Option<Date>,
  pub end_date: Option<Date>,
  pub created_by: Option<i32>,
  pub created_at: DateTime,
  pub finished_at: DateTime,
}

impl From<finished_campaign::Model> for FinishedView {
  fn from(model: finished_campaign::Model) -> Self {
    Self {
      platforms: utils::platforms_from_str(&model.platforms),
      id: model.id,
      title: model.title,
      description: model.description,
      brand_name: model.brand_name,
      logo_url: model.logo_url,
      budget_total: model.budget_total,
      budget_used: model.budget_used,
      rate_per_million: model.rate_per_million,
      max_submissions: model.max_submissions,
      max_earnings_per_creator: model.max_earnings_per_creator,
      status: model.status,
      start_date: model.start_date,
      end_date: model.end_date,
      created_by: model.created_by,
      created_at: model.created_at,
      finished_at: model.finished_at,
    }
  }
}

/// A campaign the caller joined, with metrics over their own submissions.
#[derive(Debug, Clone, Serialize)]
pub struct JoinedCampaign {
  #[serde(flatten)]
  pub campaign: CampaignView,
  pub joined_at: DateTime,
  pub participation_status: ParticipationStatus,
  pub submissions: u64,
  pub approved_submissions: u64,
  pub views: i64,
  pub earnings: Cents,
  /// Share of the campaign budget already spent, in percent
  #[serde(with = "rust_decimal::serde::float")]
  pub completion: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitReq {
  pub accounts: Vec<String>,
  pub reel_url: Option<String>,
  pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
  Approve,
  Reject,
}

#[derive(Debug, Deserialize)]
pub struct ReviewReq {
  pub decision: Decision,
  #[serde(default)]
  pub views: i64,
  /// Overrides the rate-based payout when set; number or numeric string
  #[serde(default)]
  pub earnings: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VerificationReq {
  pub platform: Option<String>,
  pub username: Option<String>,
  #[serde(alias = "profile_url")]
  pub profile_url: Option<String>,
  #[serde(alias = "followers_count")]
  pub followers_count: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AccountStatusReq {
  pub status: AccountStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterReq {
  pub email: Option<String>,
  pub password: Option<String>,
  pub username: Option<String>,
  pub full_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginReq {
  pub email: Option<String>,
  pub password: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct UserStats {
  pub total_submissions: u64,
  pub pending_submissions: u64,
  pub approved_submissions: u64,
  pub rejected_submissions: u64,
  pub total_earnings: Cents,
  pub total_views: i64,
}
