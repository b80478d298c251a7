//! Error taxonomy shared by services and HTTP handlers

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0}")]
  InvalidArgument(String),

  #[error("Authorization token required")]
  Unauthorized,

  #[error("Invalid credentials")]
  InvalidCredentials,

  #[error("{0}")]
  Forbidden(&'static str),

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("{0}")]
  AlreadyExists(String),

  #[error("{0}")]
  InvalidState(String),

  #[error("Submission limit reached ({0}/{0})")]
  LimitReached(i32),

  #[error("{0}")]
  BudgetExceeded(String),

  #[error("Database error: {0}")]
  Database(DbErr),

  #[error("Token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::InvalidArgument(message.into())
  }

  /// Stable machine-readable kind sent to clients
  pub fn kind(&self) -> &'static str {
    match self {
      Error::InvalidArgument(_) => "invalid_argument",
      Error::Unauthorized | Error::InvalidCredentials | Error::Token(_) => {
        "unauthorized"
      }
      Error::Forbidden(_) => "forbidden",
      Error::NotFound(_) => "not_found",
      Error::AlreadyExists(_) => "already_exists",
      Error::InvalidState(_) => "invalid_state",
      Error::LimitReached(_) => "limit_reached",
      Error::BudgetExceeded(_) => "budget_exceeded",
      Error::Database(_) | Error::Internal(_) => "unexpected",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
      Error::Unauthorized | Error::InvalidCredentials | Error::Token(_) => {
        StatusCode::UNAUTHORIZED
      }
      Error::Forbidden(_) => StatusCode::FORBIDDEN,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::AlreadyExists(_)
      | Error::InvalidState(_)
      | Error::LimitReached(_)
      | Error::BudgetExceeded(_) => StatusCode::CONFLICT,
      Error::Database(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  /// Maps a unique-constraint violation to `AlreadyExists`, passing any
  /// other store error through.
  pub fn on_conflict(err: DbErr, message: impl Into<String>) -> Self {
    match err.sql_err() {
      Some(SqlErr::UniqueConstraintViolation(_)) => {
        Error::AlreadyExists(message.into())
      }
      _ => Error::Database(err),
    }
  }
}

impl From<DbErr> for Error {
  fn from(err: DbErr) -> Self {
    Error::Database(err)
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Error::InvalidArgument(rejection.body_text())
  }
}

impl From<PathRejection> for Error {
  fn from(rejection: PathRejection) -> Self {
    Error::InvalidArgument(rejection.body_text())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      Error::Database(err) => {
        error!("Database failure: {err}");
        "Server error".to_string()
      }
      Error::Internal(err) => {
        error!("Internal failure: {err}");
        "Server error".to_string()
      }
      Error::Token(_) => "Invalid token".to_string(),
      other => other.to_string(),
    };

    let body = json::json!({
      "success": false,
      "kind": self.kind(),
      "error": message,
    });

    (status, Json(body)).into_response()
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
