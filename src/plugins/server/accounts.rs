use axum::{extract::State, http::StatusCode};

use super::extract::{Json, Path};
use crate::{
  auth::Caller,
  entity::connected_account,
  model::{AccountStatusReq, VerificationReq},
  prelude::*,
  state::AppState,
};

pub async fn list(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<Vec<connected_account::Model>>> {
  Ok(Json(app.sv().account.by_user(caller.user_id).await?))
}

pub async fn initiate_verification(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Json(req): Json<VerificationReq>,
) -> Result<(StatusCode, Json<connected_account::Model>)> {
  let account = app.sv().account.initiate_verification(&caller, req).await?;
  Ok((StatusCode::CREATED, Json(account)))
}

pub async fn set_status(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path(id): Path<String>,
  Json(req): Json<AccountStatusReq>,
) -> Result<Json<connected_account::Model>> {
  let id = utils::parse_id(&id, "account")?;
  Ok(Json(app.sv().account.set_status(&caller, id, req.status).await?))
}

/// Disconnects an account on behalf of its owner. Administrators only.
pub async fn delete(
  State(app): State<Arc<AppState>>,
  caller: Caller,
  Path((user_id, id)): Path<(String, String)>,
) -> Result<StatusCode> {
  caller.admin()?;

  let user_id = utils::parse_id(&user_id, "user")?;
  let id = utils::parse_id(&id, "account")?;
  app.sv().account.delete(id, user_id).await?;

  Ok(StatusCode::NO_CONTENT)
}
