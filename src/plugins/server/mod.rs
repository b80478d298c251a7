mod accounts;
mod auth;
mod campaigns;
mod extract;

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
  Router,
  routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};

use crate::{prelude::*, state::AppState};

pub struct Plugin;

/// Every route with tracing and CORS. Rate limiting is added by the
/// plugin since it needs the peer address.
pub fn router(app: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(auth::health))
    .route("/api/auth/register", post(auth::register))
    .route("/api/auth/login", post(auth::login))
    .route("/api/auth/me", get(auth::me))
    .route("/api/users/me/stats", get(auth::stats))
    .route("/api/campaigns", get(campaigns::list).post(campaigns::create))
    .route("/api/campaigns/joined", get(campaigns::joined))
    .route(
      "/api/campaigns/{id}",
      get(campaigns::get).put(campaigns::update).delete(campaigns::delete),
    )
    .route("/api/campaigns/{id}/finish", put(campaigns::finish))
    .route("/api/campaigns/{id}/join", post(campaigns::join))
    .route(
      "/api/campaigns/{id}/submissions",
      post(campaigns::submit).get(campaigns::submissions),
    )
    .route("/api/submissions/mine", get(campaigns::my_submissions))
    .route("/api/submissions/{id}/review", put(campaigns::review))
    .route("/api/finished-campaigns", get(campaigns::finished))
    .route("/api/accounts", get(accounts::list))
    .route(
      "/api/accounts/initiate-verification",
      post(accounts::initiate_verification),
    )
    .route("/api/admin/accounts/{id}/status", put(accounts::set_status))
    .route(
      "/api/admin/users/{user_id}/accounts/{id}",
      delete(accounts::delete),
    )
    .layer(
      ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
          .allow_origin(Any)
          .allow_methods(Any)
          .allow_headers(Any),
      ),
    )
    .with_state(app)
}

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    let governor_conf = Arc::new(
      GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .context("Failed to build rate limiter config")?,
    );
    let limiter = governor_conf.limiter().clone();

    let addr = SocketAddr::from(([0, 0, 0, 0], app.config.port));
    let router = router(app)
      .layer(GovernorLayer::new(governor_conf))
      .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(addr)
      .await
      .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on {addr}");

    let cleaner = async {
      loop {
        tokio::time::sleep(Duration::from_secs(60)).await;
        limiter.retain_recent();
      }
    };

    let server =
      async { axum::serve(listener, router).await.context("Axum server error") };

    tokio::select! {
      result = server => {
        match &result {
          Ok(()) => info!("Server stopped gracefully"),
          Err(err) => error!("Server stopped with error: {err:#}"),
        }
        result
      }
      _ = cleaner => {
        error!("Rate limiter cleaner stopped unexpectedly");
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use json::{Value, json};
  use tower::ServiceExt;

  use super::*;
  use crate::{state::Config, sv::testing::setup_test_db};

  async fn app() -> Router {
    let config = Config {
      admin_emails: ["boss@creatorpulse.io".to_string()].into(),
      ..Config::default()
    };
    router(Arc::new(AppState::with_db(setup_test_db().await, config)))
  }

  async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(body) => req
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string())),
      None => req.body(Body::empty()),
    }
    .unwrap();

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
  }

  async fn register(router: &Router, email: &str) -> String {
    let (status, body) = call(
      router,
      "POST",
      "/api/auth/register",
      None,
      Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
  }

  #[tokio::test]
  async fn test_health() {
    let router = app().await;
    let res = router
      .oneshot(Request::get("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn test_auth_gates() {
    let router = app().await;
    let creator = register(&router, "c@mail.io").await;

    let (status, body) = call(&router, "GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) =
      call(&router, "GET", "/api/auth/me", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) =
      call(&router, "GET", "/api/auth/me", Some(&creator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "c@mail.io");
    assert!(body.get("password_hash").is_none());

    let (status, body) = call(
      &router,
      "POST",
      "/api/campaigns",
      Some(&creator),
      Some(json!({ "title": "X", "brand_name": "Y" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");

    let (status, _) =
      call(&router, "GET", "/api/finished-campaigns", Some(&creator), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn test_login() {
    let router = app().await;
    register(&router, "c@mail.io").await;

    let (status, body) = call(
      &router,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "c@mail.io", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());

    let (status, _) = call(
      &router,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": "c@mail.io", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn test_malformed_bodies_use_error_shape() {
    let router = app().await;

    let (status, body) = call(
      &router,
      "POST",
      "/api/auth/login",
      None,
      Some(json!({ "email": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "invalid_argument");

    let req = Request::post("/api/auth/register")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{\"email\":"))
      .unwrap();
    let res = router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "invalid_argument");
  }

  #[tokio::test]
  async fn test_campaign_flow() {
    let router = app().await;
    let admin = register(&router, "boss@creatorpulse.io").await;
    let creator = register(&router, "c@mail.io").await;

    let (status, campaign) = call(
      &router,
      "POST",
      "/api/campaigns",
      Some(&admin),
      Some(json!({
        "title": "X",
        "brand_name": "Y",
        "budget_total": "1000",
        "rate_per_million": 500,
        "platforms": "[\"Instagram\"]",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(campaign["status"], "active");
    assert_eq!(campaign["budget_used"], 0.0);
    assert_eq!(campaign["budget_total"], 1000.0);
    assert_eq!(campaign["platforms"], json!(["Instagram"]));
    let id = campaign["id"].as_i64().unwrap();

    let (status, list) = call(&router, "GET", "/api/campaigns", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let join = format!("/api/campaigns/{id}/join");
    let (status, _) = call(&router, "POST", &join, Some(&creator), None).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = call(&router, "POST", &join, Some(&creator), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_exists");

    let (status, sub) = call(
      &router,
      "POST",
      &format!("/api/campaigns/{id}/submissions"),
      Some(&creator),
      Some(json!({ "accounts": ["@a"], "reel_url": "http://x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sub["status"], "pending");

    let (status, reviewed) = call(
      &router,
      "PUT",
      &format!("/api/submissions/{}/review", sub["id"]),
      Some(&admin),
      Some(json!({ "decision": "approve", "views": 200000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["earnings"], 100.0);

    let (status, joined) =
      call(&router, "GET", "/api/campaigns/joined", Some(&creator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(joined[0]["id"], id);
    assert_eq!(joined[0]["earnings"], 100.0);
    assert_eq!(joined[0]["budget_used"], 100.0);

    let (status, finished) = call(
      &router,
      "PUT",
      &format!("/api/campaigns/{id}/finish"),
      Some(&admin),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["id"], id);
    assert!(finished["finished_at"].is_string());

    let (status, body) =
      call(&router, "GET", &format!("/api/campaigns/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
  }

  #[tokio::test]
  async fn test_bad_ids_are_rejected() {
    let router = app().await;

    let (status, body) =
      call(&router, "GET", "/api/campaigns/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_argument");

    let (status, _) = call(&router, "GET", "/api/campaigns/-4", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn test_accounts_flow() {
    let router = app().await;
    let admin = register(&router, "boss@creatorpulse.io").await;
    let creator = register(&router, "c@mail.io").await;

    let (status, account) = call(
      &router,
      "POST",
      "/api/accounts/initiate-verification",
      Some(&creator),
      Some(json!({
        "platform": "instagram",
        "username": "a",
        "profileUrl": "https://instagram.com/a",
        "followersCount": 1000,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(account["status"], "pending");

    let (_, me) = call(&router, "GET", "/api/auth/me", Some(&creator), None).await;
    let account_id = account["id"].as_i64().unwrap();
    let user_id = me["id"].as_i64().unwrap();

    let (status, verified) = call(
      &router,
      "PUT",
      &format!("/api/admin/accounts/{account_id}/status"),
      Some(&admin),
      Some(json!({ "status": "verified" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["status"], "verified");

    let path = format!("/api/admin/users/{user_id}/accounts/{account_id}");
    let (status, _) = call(&router, "DELETE", &path, Some(&creator), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, "DELETE", &path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, list) =
      call(&router, "GET", "/api/accounts", Some(&creator), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
  }
}
