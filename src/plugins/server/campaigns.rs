use axum::{extract::State, http::StatusCode};

use super::extract::{Json, Path};
use crate::{
  auth::Caller,
  entity::{participation, submission},
  model::{
    CampaignReq, CampaignView, FinishedView, JoinedCampaign, ReviewReq,
    SubmitReq,
  },
  prelude::*,
  state::AppState,
};

fn campaign_id(raw: &str) -> Result<i32> {
  utils::parse_id(raw, "campaign")
}

pub async fn list(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<CampaignView>>> {
  Ok(Json(app.sv().campaign.list().await?))
}

pub async fn get(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<CampaignView>> {
  Ok(Json(app.sv().campaign.get(campaign_id(&id)?).await?))
}

pub async fn create(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Json(req): Json<CampaignReq>,
) -> Result<(StatusCode, Json<CampaignView>)> {
  let campaign = app.sv().campaign.create(&caller, req).await?;
  Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
  Json(req): Json<CampaignReq>,
) -> Result<Json<CampaignView>> {
  let id = campaign_id(&id)?;
  Ok(Json(app.sv().campaign.update(&caller, id, req).await?))
}

pub async fn delete(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<CampaignView>> {
  let id = campaign_id(&id)?;
  Ok(Json(app.sv().lifecycle.delete(&caller, id).await?))
}

pub async fn finish(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<FinishedView>> {
  let id = campaign_id(&id)?;
  Ok(Json(app.sv().lifecycle.finish(&caller, id).await?))
}

pub async fn finished(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<Vec<FinishedView>>> {
  Ok(Json(app.sv().lifecycle.finished(&caller).await?))
}

pub async fn join(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<(StatusCode, Json<participation::Model>)> {
  let id = campaign_id(&id)?;
  let joined = app.sv().lifecycle.join(&caller, id).await?;
  Ok((StatusCode::CREATED, Json(joined)))
}

pub async fn joined(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<Vec<JoinedCampaign>>> {
  Ok(Json(app.sv().lifecycle.joined(&caller).await?))
}

pub async fn submit(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
  Json(req): Json<SubmitReq>,
) -> Result<(StatusCode, Json<submission::Model>)> {
  let id = campaign_id(&id)?;
  let sub = app.sv().lifecycle.submit(&caller, id, req).await?;
  Ok((StatusCode::CREATED, Json(sub)))
}

pub async fn submissions(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
) -> Result<Json<Vec<submission::Model>>> {
  let id = campaign_id(&id)?;
  Ok(Json(app.sv().lifecycle.submissions(&caller, id).await?))
}

pub async fn my_submissions(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<Vec<submission::Model>>> {
  Ok(Json(app.sv().lifecycle.my_submissions(&caller).await?))
}

pub async fn review(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
  Json(req): Json<ReviewReq>,
) -> Result<Json<submission::Model>> {
  let id = utils::parse_id(&id, "submission")?;
  Ok(Json(app.sv().lifecycle.review(&caller, id, req).await?))
}
