use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::extract::Json;
use crate::{
  auth::Caller,
  entity::user,
  model::{LoginReq, RegisterReq, UserStats},
  prelude::*,
  state::AppState,
};

#[derive(Debug, Serialize)]
pub struct Session {
  pub user: user::Model,
  pub token: String,
}

pub async fn health() -> &'static str {
  "OK"
}

pub async fn register(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RegisterReq>,
) -> Result<(StatusCode, Json<Session>)> {
  let is_admin = req
    .email
    .as_deref()
    .is_some_and(|email| app.config.is_admin_email(email.trim()));

  let user = app.sv().user.register(req, is_admin).await?;
  let token = app.keys.issue(&user)?;
  Ok((StatusCode::CREATED, Json(Session { user, token })))
}

pub async fn login(
  State(app): State<Arc<AppState>>,
  Json(req): Json<LoginReq>,
) -> Result<Json<Session>> {
  let (Some(email), Some(password)) = (req.email, req.password) else {
    return Err(Error::invalid("email and password are required"));
  };

  let user = app.sv().user.login(&email, &password).await?;
  let token = app.keys.issue(&user)?;
  Ok(Json(Session { user, token }))
}

pub async fn me(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<user::Model>> {
  Ok(Json(app.sv().user.by_id(caller.user_id).await?))
}

pub async fn stats(
  State(app): State<Arc<AppState>>,
  caller: Caller,
) -> Result<Json<UserStats>> {
  Ok(Json(app.sv().user.stats(caller.user_id).await?))
}
