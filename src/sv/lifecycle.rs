//! Campaign lifecycle: participation, submissions, review, budget and the
//! archive move.

use std::collections::HashMap;

use json::Value;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;

use crate::{
  auth::Caller,
  entity::{
    CampaignStatus, ParticipationStatus, SubmissionStatus, campaign,
    finished_campaign, participation, submission,
  },
  model::{
    CampaignView, Decision, FinishedView, JoinedCampaign, ReviewReq, SubmitReq,
  },
  money::Cents,
  prelude::*,
  sv,
};

pub struct Lifecycle<'a> {
  db: &'a DatabaseConnection,
}

/// Atomic `budget_used += delta` guarded by `budget_total` in the same
/// statement. Zero affected rows means the ceiling held or the campaign
/// is gone.
async fn charge<C: ConnectionTrait>(
  conn: &C,
  campaign_id: i32,
  delta: Cents,
) -> Result<()> {
  if delta.is_negative() {
    return Err(Error::invalid("Charge must be a non-negative amount"));
  }

  let res = campaign::Entity::update_many()
    .col_expr(
      campaign::Column::BudgetUsed,
      Expr::col(campaign::Column::BudgetUsed).add(delta.0),
    )
    .col_expr(campaign::Column::UpdatedAt, Expr::value(utils::now()))
    .filter(campaign::Column::Id.eq(campaign_id))
    .filter(
      Expr::expr(Expr::col(campaign::Column::BudgetUsed).add(delta.0))
        .lte(Expr::col(campaign::Column::BudgetTotal)),
    )
    .exec(conn)
    .await?;

  if res.rows_affected == 0 {
    let exists = campaign::Entity::find_by_id(campaign_id).count(conn).await?;
    return Err(if exists > 0 {
      Error::BudgetExceeded("Campaign budget exceeded".into())
    } else {
      Error::NotFound("Campaign")
    });
  }
  Ok(())
}

/// Writes a review outcome only while the submission is still pending, so
/// two reviews of one submission cannot both land.
async fn settle<C: ConnectionTrait>(
  conn: &C,
  submission_id: i32,
  outcome: submission::ActiveModel,
) -> Result<submission::Model> {
  let res = submission::Entity::update_many()
    .set(outcome)
    .filter(submission::Column::Id.eq(submission_id))
    .filter(submission::Column::Status.eq(SubmissionStatus::Pending))
    .exec(conn)
    .await?;

  if res.rows_affected == 0 {
    return Err(Error::InvalidState("Submission already reviewed".into()));
  }

  submission::Entity::find_by_id(submission_id)
    .one(conn)
    .await?
    .ok_or(Error::NotFound("Submission"))
}

async fn approved_earnings<C: ConnectionTrait>(
  conn: &C,
  campaign_id: i32,
  user_id: i32,
) -> Result<Cents> {
  let approved = submission::Entity::find()
    .filter(submission::Column::CampaignId.eq(campaign_id))
    .filter(submission::Column::UserId.eq(user_id))
    .filter(submission::Column::Status.eq(SubmissionStatus::Approved))
    .all(conn)
    .await?;

  Ok(approved.iter().map(|sub| sub.earnings).sum())
}

/// `views * rate / 1e6`, rounded to cents.
fn payout(views: i64, rate: Cents) -> Result<Cents> {
  Decimal::from(views)
    .checked_mul(rate.to_decimal())
    .and_then(|amount| amount.checked_div(Decimal::from(1_000_000)))
    .and_then(Cents::from_decimal)
    .ok_or_else(|| Error::invalid("Payout out of range"))
}

fn explicit_earnings(value: Option<&Value>) -> Result<Option<Cents>> {
  match value {
    None | Some(Value::Null) => Ok(None),
    Some(raw) => Cents::parse(raw)
      .filter(|amount| !amount.is_negative())
      .map(Some)
      .ok_or_else(|| Error::invalid("earnings must be a non-negative amount")),
  }
}

impl<'a> Lifecycle<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn join(
    &self,
    caller: &Caller,
    campaign_id: i32,
  ) -> Result<participation::Model> {
    let campaign = sv::Campaign::new(self.db).model(campaign_id).await?;
    if campaign.status != CampaignStatus::Active {
      return Err(Error::InvalidState("Campaign is not active".into()));
    }

    let joined = participation::ActiveModel {
      campaign_id: Set(campaign_id),
      user_id: Set(caller.user_id),
      joined_at: Set(utils::now()),
      status: Set(ParticipationStatus::Active),
    }
    .insert(self.db)
    .await
    .map_err(|err| Error::on_conflict(err, "Already joined this campaign"))?;

    debug!("User {} joined campaign {campaign_id}", caller.user_id);
    Ok(joined)
  }

  pub async fn joined(&self, caller: &Caller) -> Result<Vec<JoinedCampaign>> {
    let rows = participation::Entity::find()
      .filter(participation::Column::UserId.eq(caller.user_id))
      .filter(participation::Column::Status.eq(ParticipationStatus::Active))
      .order_by_desc(participation::Column::JoinedAt)
      .order_by_desc(participation::Column::CampaignId)
      .find_also_related(campaign::Entity)
      .all(self.db)
      .await?;

    let rows: Vec<_> = rows
      .into_iter()
      .filter_map(|(joined, campaign)| campaign.map(|c| (joined, c)))
      .collect();
    let ids: Vec<i32> = rows.iter().map(|(_, c)| c.id).collect();

    let mut subs: HashMap<i32, Vec<submission::Model>> = HashMap::new();
    if !ids.is_empty() {
      for sub in submission::Entity::find()
        .filter(submission::Column::UserId.eq(caller.user_id))
        .filter(submission::Column::CampaignId.is_in(ids))
        .all(self.db)
        .await?
      {
        subs.entry(sub.campaign_id).or_default().push(sub);
      }
    }

    let joined = rows
      .into_iter()
      .map(|(joined, campaign)| {
        let own = subs.remove(&campaign.id).unwrap_or_default();
        let approved: Vec<_> = own
          .iter()
          .filter(|sub| sub.status == SubmissionStatus::Approved)
          .collect();

        JoinedCampaign {
          submissions: own.len() as u64,
          approved_submissions: approved.len() as u64,
          views: approved
            .iter()
            .fold(0i64, |views, sub| views.saturating_add(sub.views)),
          earnings: approved.iter().map(|sub| sub.earnings).sum(),
          completion: campaign.budget_used.percent_of(campaign.budget_total),
          joined_at: joined.joined_at,
          participation_status: joined.status,
          campaign: campaign.into(),
        }
      })
      .collect();

    Ok(joined)
  }

  pub async fn submit(
    &self,
    caller: &Caller,
    campaign_id: i32,
    req: SubmitReq,
  ) -> Result<submission::Model> {
    let accounts: Vec<String> =
      req.accounts.iter().map(|id| id.trim().to_string()).collect();
    if accounts.is_empty() || accounts.iter().any(String::is_empty) {
      return Err(Error::invalid("At least one account is required"));
    }
    let Some(reel_url) = req
      .reel_url
      .map(|url| url.trim().to_string())
      .filter(|url| !url.is_empty())
    else {
      return Err(Error::invalid("reel_url is required"));
    };

    let txn = self.db.begin().await?;

    let campaign = campaign::Entity::find_by_id(campaign_id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound("Campaign"))?;
    if campaign.status != CampaignStatus::Active {
      return Err(Error::InvalidState("Campaign is not active".into()));
    }

    let joined = participation::Entity::find_by_id((campaign_id, caller.user_id))
      .one(&txn)
      .await?;
    if !joined.is_some_and(|p| p.status == ParticipationStatus::Active) {
      return Err(Error::InvalidState(
        "Join the campaign before submitting".into(),
      ));
    }

    if let Some(max) = campaign.max_submissions {
      let used = submission::Entity::find()
        .filter(submission::Column::CampaignId.eq(campaign_id))
        .filter(submission::Column::UserId.eq(caller.user_id))
        .filter(submission::Column::Status.ne(SubmissionStatus::Rejected))
        .count(&txn)
        .await?;
      if used >= max as u64 {
        return Err(Error::LimitReached(max));
      }
    }

    if campaign.budget_used >= campaign.budget_total {
      return Err(Error::BudgetExceeded("Campaign budget exhausted".into()));
    }
    if let Some(cap) = campaign.max_earnings_per_creator {
      let earned = approved_earnings(&txn, campaign_id, caller.user_id).await?;
      if earned >= cap {
        return Err(Error::BudgetExceeded(
          "Earnings cap reached for this campaign".into(),
        ));
      }
    }

    let sub = submission::ActiveModel {
      id: NotSet,
      campaign_id: Set(campaign_id),
      user_id: Set(caller.user_id),
      accounts: Set(json::Value::from(accounts)),
      reel_url: Set(reel_url),
      metadata: Set(req.metadata.filter(|m| !m.is_null())),
      status: Set(SubmissionStatus::Pending),
      earnings: Set(Cents::ZERO),
      views: Set(0),
      created_at: Set(utils::now()),
      reviewed_at: Set(None),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
      "Submission {} to campaign {campaign_id} by {}",
      sub.id, caller.user_id
    );
    Ok(sub)
  }

  pub async fn review(
    &self,
    caller: &Caller,
    submission_id: i32,
    req: ReviewReq,
  ) -> Result<submission::Model> {
    caller.admin()?;

    if req.views < 0 {
      return Err(Error::invalid("views must not be negative"));
    }
    if req.views > i64::from(i32::MAX) {
      return Err(Error::invalid("views out of range"));
    }
    let explicit = explicit_earnings(req.earnings.as_ref())?;

    let txn = self.db.begin().await?;

    let sub = submission::Entity::find_by_id(submission_id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound("Submission"))?;
    if sub.status != SubmissionStatus::Pending {
      return Err(Error::InvalidState("Submission already reviewed".into()));
    }

    let mut outcome = submission::ActiveModel {
      reviewed_at: Set(Some(utils::now())),
      ..Default::default()
    };

    let sub = match req.decision {
      Decision::Reject => {
        outcome.status = Set(SubmissionStatus::Rejected);
        settle(&txn, sub.id, outcome).await?
      }
      Decision::Approve => {
        let campaign = campaign::Entity::find_by_id(sub.campaign_id)
          .one(&txn)
          .await?
          .ok_or_else(|| {
            Error::InvalidState("Campaign is no longer live".into())
          })?;

        let rate = campaign.rate_per_million.unwrap_or_default();
        let earnings = match explicit {
          Some(earnings) => earnings,
          None => payout(req.views, rate)?,
        };

        if let Some(cap) = campaign.max_earnings_per_creator {
          let earned =
            approved_earnings(&txn, campaign.id, sub.user_id).await?;
          if earned.checked_add(earnings).is_none_or(|total| total > cap) {
            return Err(Error::BudgetExceeded(format!(
              "Payout exceeds the per-creator cap of {cap}"
            )));
          }
        }

        outcome.status = Set(SubmissionStatus::Approved);
        outcome.earnings = Set(earnings);
        outcome.views = Set(req.views);
        let sub = settle(&txn, sub.id, outcome).await?;
        charge(&txn, campaign.id, earnings).await?;
        sub
      }
    };

    txn.commit().await?;

    info!(
      "Submission {} {:?} by {} ({} earned)",
      sub.id, sub.status, caller.user_id, sub.earnings
    );
    Ok(sub)
  }

  pub async fn submissions(
    &self,
    caller: &Caller,
    campaign_id: i32,
  ) -> Result<Vec<submission::Model>> {
    caller.admin()?;

    Ok(
      submission::Entity::find()
        .filter(submission::Column::CampaignId.eq(campaign_id))
        .order_by_desc(submission::Column::CreatedAt)
        .order_by_desc(submission::Column::Id)
        .all(self.db)
        .await?,
    )
  }

  pub async fn my_submissions(
    &self,
    caller: &Caller,
  ) -> Result<Vec<submission::Model>> {
    Ok(
      submission::Entity::find()
        .filter(submission::Column::UserId.eq(caller.user_id))
        .order_by_desc(submission::Column::CreatedAt)
        .order_by_desc(submission::Column::Id)
        .all(self.db)
        .await?,
    )
  }

  pub async fn charge_budget(
    &self,
    campaign_id: i32,
    delta: Cents,
  ) -> Result<()> {
    charge(self.db, campaign_id, delta).await
  }

  /// Moves a live campaign into the archive. Both tables change together
  /// or not at all; a store failure on either side surfaces as is.
  pub async fn finish(
    &self,
    caller: &Caller,
    campaign_id: i32,
  ) -> Result<FinishedView> {
    caller.admin()?;

    let txn = self.db.begin().await?;

    let Some(campaign) =
      campaign::Entity::find_by_id(campaign_id).one(&txn).await?
    else {
      txn.rollback().await?;
      return Err(Error::NotFound("Campaign"));
    };

    let archived = finished_campaign::ActiveModel {
      id: Set(campaign.id),
      title: Set(campaign.title),
      description: Set(campaign.description),
      brand_name: Set(campaign.brand_name),
      logo_url: Set(campaign.logo_url),
      budget_total: Set(campaign.budget_total),
      budget_used: Set(campaign.budget_used),
      rate_per_million: Set(campaign.rate_per_million),
      max_submissions: Set(campaign.max_submissions),
      max_earnings_per_creator: Set(
        campaign.max_earnings_per_creator.unwrap_or_default(),
      ),
      platforms: Set(campaign.platforms),
      status: Set(campaign.status),
      start_date: Set(campaign.start_date),
      end_date: Set(campaign.end_date),
      created_by: Set(campaign.created_by),
      created_at: Set(campaign.created_at),
      finished_at: Set(utils::now()),
    }
    .insert(&txn)
    .await?;

    let res = campaign::Entity::delete_by_id(campaign_id).exec(&txn).await?;
    if res.rows_affected == 0 {
      txn.rollback().await?;
      return Err(Error::NotFound("Campaign"));
    }

    txn.commit().await?;

    info!("Campaign {campaign_id} finished by {}", caller.user_id);
    Ok(archived.into())
  }

  pub async fn delete(
    &self,
    caller: &Caller,
    campaign_id: i32,
  ) -> Result<CampaignView> {
    sv::Campaign::new(self.db).delete(caller, campaign_id).await
  }

  pub async fn finished(&self, caller: &Caller) -> Result<Vec<FinishedView>> {
    caller.admin()?;

    let finished = finished_campaign::Entity::find()
      .order_by_desc(finished_campaign::Column::FinishedAt)
      .order_by_desc(finished_campaign::Column::Id)
      .all(self.db)
      .await?;

    Ok(finished.into_iter().map(FinishedView::from).collect())
  }
}
