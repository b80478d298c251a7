use std::{collections::HashSet, env, fmt::Display, str::FromStr};

use crate::{auth::Keys, prelude::*, sv};

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub jwt_secret: String,
  pub token_ttl: Duration,
  pub port: u16,
  /// Emails that register as administrators
  pub admin_emails: HashSet<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_url: String::from("sqlite:creatorpulse.db?mode=rwc"),
      jwt_secret: String::from("dev_jwt_secret"),
      token_ttl: Duration::from_secs(7 * 24 * 3600),
      port: 5000,
      admin_emails: HashSet::new(),
    }
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let defaults = Self::default();

    let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET not set")?;

    let token_ttl = match env::var("TOKEN_TTL") {
      Ok(raw) => humantime::parse_duration(&raw)
        .with_context(|| format!("Invalid TOKEN_TTL `{raw}`"))?,
      Err(_) => defaults.token_ttl,
    };

    let admin_emails = env::var("ADMIN_EMAILS")
      .unwrap_or_default()
      .split(',')
      .map(|email| email.trim().to_lowercase())
      .filter(|email| !email.is_empty())
      .collect();

    Ok(Self {
      database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
      jwt_secret,
      token_ttl,
      port: try_load("PORT", defaults.port)?,
      admin_emails,
    })
  }

  pub fn is_admin_email(&self, email: &str) -> bool {
    self.admin_emails.contains(&email.to_lowercase())
  }
}

fn try_load<T: FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
  T::Err: Display,
{
  match env::var(key) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|err| anyhow::anyhow!("Invalid {key} value `{raw}`: {err}")),
    Err(_) => {
      debug!("{key} not set, using default");
      Ok(default)
    }
  }
}

pub struct Services<'a> {
  pub user: sv::User<'a>,
  pub campaign: sv::Campaign<'a>,
  pub lifecycle: sv::Lifecycle<'a>,
  pub account: sv::Account<'a>,
}

pub struct AppState {
  pub db: DatabaseConnection,
  pub keys: Keys,
  pub config: Config,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
      .await
      .context("Failed to connect to database")?;

    info!("Running migrations...");
    Migrator::up(&db, None).await.context("Failed to run migrations")?;

    Ok(Self::with_db(db, config))
  }

  pub fn with_db(db: DatabaseConnection, config: Config) -> Self {
    let keys = Keys::new(&config.jwt_secret, config.token_ttl);
    Self { db, keys, config }
  }

  pub fn sv(&self) -> Services<'_> {
    Services {
      user: sv::User::new(&self.db),
      campaign: sv::Campaign::new(&self.db),
      lifecycle: sv::Lifecycle::new(&self.db),
      account: sv::Account::new(&self.db),
    }
  }
}
