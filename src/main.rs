//! CreatorPulse - campaign lifecycle and budget accounting backend
//!
//! - SeaORM over SQLite for persistence
//! - Axum HTTP API with JWT auth and rate limiting
//! - Services run as supervised plugins on Tokio

mod auth;
mod entity;
mod error;
mod model;
mod money;
mod plugins;
mod prelude;
mod state;
mod sv;
mod utils;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{
  plugins::server,
  prelude::*,
  state::{AppState, Config},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "creatorpulse=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  info!("Starting CreatorPulse v{}", env!("CARGO_PKG_VERSION"));

  let config = Config::from_env()?;
  if config.admin_emails.is_empty() {
    warn!("ADMIN_EMAILS is empty, nobody can manage campaigns");
  }

  let app = Arc::new(AppState::new(config).await?);

  plugins::App::new().register(server::Plugin).run(app);

  tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
  info!("Shutting down");

  Ok(())
}
