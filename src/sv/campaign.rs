//! Campaign repository: CRUD with the normalization every read goes through

use json::Value;

use crate::{
  auth::Caller,
  entity::{CampaignStatus, campaign, participation, submission},
  model::{CampaignReq, CampaignView},
  money::Cents,
  prelude::*,
};

pub struct Campaign<'a> {
  db: &'a DatabaseConnection,
}

/// Campaign fields after merging a payload over a base row.
#[derive(Debug, Clone, PartialEq)]
struct Draft {
  title: Option<String>,
  description: Option<String>,
  brand_name: Option<String>,
  logo_url: Option<String>,
  budget_total: Cents,
  budget_used: Cents,
  rate_per_million: Option<Cents>,
  max_submissions: Option<i32>,
  max_earnings_per_creator: Option<Cents>,
  platforms: Vec<String>,
  status: CampaignStatus,
  start_date: Option<Date>,
  end_date: Option<Date>,
}

impl Draft {
  fn blank() -> Self {
    Self {
      title: None,
      description: None,
      brand_name: None,
      logo_url: None,
      budget_total: Cents::ZERO,
      budget_used: Cents::ZERO,
      rate_per_million: None,
      max_submissions: None,
      max_earnings_per_creator: None,
      platforms: Vec::new(),
      status: CampaignStatus::Active,
      start_date: None,
      end_date: None,
    }
  }

  fn of(model: &campaign::Model) -> Self {
    Self {
      title: Some(model.title.clone()),
      description: model.description.clone(),
      brand_name: Some(model.brand_name.clone()),
      logo_url: model.logo_url.clone(),
      budget_total: model.budget_total,
      budget_used: model.budget_used,
      rate_per_million: model.rate_per_million,
      max_submissions: model.max_submissions,
      max_earnings_per_creator: model.max_earnings_per_creator,
      platforms: utils::platforms_from_str(&model.platforms),
      status: model.status,
      start_date: model.start_date,
      end_date: model.end_date,
    }
  }

  /// Overlays every field present in `req`. Money defaults to 0 and
  /// optional numbers to `None` when the value is null or unparseable.
  fn apply(mut self, req: CampaignReq) -> Result<Self> {
    if let Some(v) = req.title {
      self.title = utils::text(&v);
    }
    if let Some(v) = req.description {
      self.description = utils::text(&v);
    }
    if let Some(v) = req.brand_name {
      self.brand_name = utils::text(&v);
    }
    if let Some(v) = req.logo_url {
      self.logo_url = utils::text(&v);
    }
    if let Some(v) = req.budget_total {
      self.budget_total = Cents::parse(&v).unwrap_or_default();
    }
    if let Some(v) = req.budget_used {
      self.budget_used = Cents::parse(&v).unwrap_or_default();
    }
    if let Some(v) = req.rate_per_million {
      self.rate_per_million = Cents::parse(&v);
    }
    if let Some(v) = req.max_submissions {
      self.max_submissions = match utils::integer(&v) {
        Some(n) => Some(
          i32::try_from(n)
            .map_err(|_| Error::invalid("max_submissions out of range"))?,
        ),
        None => None,
      };
    }
    if let Some(v) = req.max_earnings_per_creator {
      self.max_earnings_per_creator = Cents::parse(&v);
    }
    if let Some(v) = req.platforms {
      self.platforms = utils::platforms(&v);
    }
    if let Some(v) = req.status
      && !v.is_null()
    {
      self.status = utils::text(&v)
        .and_then(|raw| CampaignStatus::parse(&raw))
        .ok_or_else(|| Error::invalid(format!("Invalid status {v}")))?;
    }
    if let Some(v) = req.start_date {
      self.start_date = date_field(&v, "start_date")?;
    }
    if let Some(v) = req.end_date {
      self.end_date = date_field(&v, "end_date")?;
    }
    Ok(self)
  }

  fn validate(&self) -> Result<()> {
    if self.title.is_none() || self.brand_name.is_none() {
      return Err(Error::invalid("title and brand_name are required"));
    }

    let money = [
      ("budget_total", Some(self.budget_total)),
      ("budget_used", Some(self.budget_used)),
      ("rate_per_million", self.rate_per_million),
      ("max_earnings_per_creator", self.max_earnings_per_creator),
    ];
    for (name, value) in money {
      if value.is_some_and(Cents::is_negative) {
        return Err(Error::invalid(format!("{name} must not be negative")));
      }
    }
    if self.max_submissions.is_some_and(|n| n < 0) {
      return Err(Error::invalid("max_submissions must not be negative"));
    }
    if self.budget_used > self.budget_total {
      return Err(Error::invalid("budget_used exceeds budget_total"));
    }
    if let (Some(start), Some(end)) = (self.start_date, self.end_date)
      && end < start
    {
      return Err(Error::invalid("end_date is before start_date"));
    }
    Ok(())
  }

  fn platforms_json(&self) -> String {
    Value::from(self.platforms.clone()).to_string()
  }
}

fn date_field(value: &Value, name: &str) -> Result<Option<Date>> {
  if value.is_null() || utils::text(value).is_none() {
    return Ok(None);
  }
  utils::date(value)
    .map(Some)
    .ok_or_else(|| Error::invalid(format!("Invalid {name}, expected YYYY-MM-DD")))
}

impl<'a> Campaign<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn list(&self) -> Result<Vec<CampaignView>> {
    let campaigns = campaign::Entity::find()
      .order_by_desc(campaign::Column::Id)
      .all(self.db)
      .await?;

    Ok(campaigns.into_iter().map(CampaignView::from).collect())
  }

  pub async fn get(&self, id: i32) -> Result<CampaignView> {
    self.model(id).await.map(CampaignView::from)
  }

  pub(crate) async fn model(&self, id: i32) -> Result<campaign::Model> {
    campaign::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Campaign"))
  }

  pub async fn create(
    &self,
    caller: &Caller,
    req: CampaignReq,
  ) -> Result<CampaignView> {
    caller.admin()?;

    let draft = Draft::blank().apply(req)?;
    draft.validate()?;

    let now = utils::now();
    let campaign = campaign::ActiveModel {
      id: NotSet,
      platforms: Set(draft.platforms_json()),
      title: Set(draft.title.unwrap_or_default()),
      description: Set(draft.description),
      brand_name: Set(draft.brand_name.unwrap_or_default()),
      logo_url: Set(draft.logo_url),
      budget_total: Set(draft.budget_total),
      budget_used: Set(draft.budget_used),
      rate_per_million: Set(draft.rate_per_million),
      max_submissions: Set(draft.max_submissions),
      max_earnings_per_creator: Set(draft.max_earnings_per_creator),
      status: Set(draft.status),
      start_date: Set(draft.start_date),
      end_date: Set(draft.end_date),
      created_by: Set(Some(caller.user_id)),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(self.db)
    .await?;

    info!("Campaign {} created by {}", campaign.id, caller.user_id);
    Ok(campaign.into())
  }

  /// Partial update: absent fields keep their stored value.
  pub async fn update(
    &self,
    caller: &Caller,
    id: i32,
    req: CampaignReq,
  ) -> Result<CampaignView> {
    caller.admin()?;

    let model = self.model(id).await?;
    // budget_used is only written when the payload names it, so concurrent
    // charges are not overwritten by unrelated edits
    let touches_used = req.budget_used.is_some();

    let draft = Draft::of(&model).apply(req)?;
    draft.validate()?;

    let mut active: campaign::ActiveModel = model.into();
    active.platforms = Set(draft.platforms_json());
    active.title = Set(draft.title.unwrap_or_default());
    active.description = Set(draft.description);
    active.brand_name = Set(draft.brand_name.unwrap_or_default());
    active.logo_url = Set(draft.logo_url);
    active.budget_total = Set(draft.budget_total);
    if touches_used {
      active.budget_used = Set(draft.budget_used);
    }
    active.rate_per_million = Set(draft.rate_per_million);
    active.max_submissions = Set(draft.max_submissions);
    active.max_earnings_per_creator = Set(draft.max_earnings_per_creator);
    active.status = Set(draft.status);
    active.start_date = Set(draft.start_date);
    active.end_date = Set(draft.end_date);
    active.updated_at = Set(utils::now());

    let campaign = active.update(self.db).await?;
    Ok(campaign.into())
  }

  /// Hard delete, bypassing the archive. Participation rows and
  /// submissions of the campaign go with it.
  pub async fn delete(&self, caller: &Caller, id: i32) -> Result<CampaignView> {
    caller.admin()?;

    let txn = self.db.begin().await?;

    let campaign = campaign::Entity::find_by_id(id)
      .one(&txn)
      .await?
      .ok_or(Error::NotFound("Campaign"))?;

    participation::Entity::delete_many()
      .filter(participation::Column::CampaignId.eq(id))
      .exec(&txn)
      .await?;
    submission::Entity::delete_many()
      .filter(submission::Column::CampaignId.eq(id))
      .exec(&txn)
      .await?;

    let res = campaign::Entity::delete_by_id(id).exec(&txn).await?;
    if res.rows_affected == 0 {
      return Err(Error::NotFound("Campaign"));
    }

    txn.commit().await?;

    warn!("Campaign {id} deleted by {}", caller.user_id);
    Ok(campaign.into())
  }
}
