//! Caller identity: password hashing, JWT issuance and the request
//! extractor that resolves a bearer token into a [`Caller`].

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::user, prelude::*, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub sub: i32,
  pub admin: bool,
  pub exp: u64,
}

/// Verified identity of whoever issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
  pub user_id: i32,
  pub is_admin: bool,
}

impl Caller {
  pub fn user(user_id: i32) -> Self {
    Self { user_id, is_admin: false }
  }

  pub fn administrator(user_id: i32) -> Self {
    Self { user_id, is_admin: true }
  }

  pub fn admin(&self) -> Result<()> {
    if self.is_admin { Ok(()) } else { Err(Error::Forbidden("Admin required")) }
  }
}

pub struct Keys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl: Duration,
}

impl Keys {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl,
    }
  }

  pub fn issue(&self, user: &user::Model) -> Result<String> {
    let claims = Claims {
      sub: user.id,
      admin: user.is_admin,
      exp: Utc::now().timestamp() as u64 + self.ttl.as_secs(),
    };
    Ok(jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?)
  }

  pub fn verify(&self, token: &str) -> Result<Caller> {
    let data = jsonwebtoken::decode::<Claims>(
      token,
      &self.decoding,
      &Validation::default(),
    )?;
    Ok(Caller { user_id: data.claims.sub, is_admin: data.claims.admin })
  }
}

pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
    .map_err(|err| Error::Internal(format!("Salt encoding failed: {err}")))?;

  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|err| Error::Internal(format!("Password hashing failed: {err}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash).is_ok_and(|parsed| {
    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
  })
}

impl FromRequestParts<Arc<AppState>> for Caller {
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    app: &Arc<AppState>,
  ) -> Result<Self> {
    let token = parts
      .headers
      .get(AUTHORIZATION)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| value.strip_prefix("Bearer "))
      .map(str::trim)
      .filter(|token| !token.is_empty())
      .ok_or(Error::Unauthorized)?;

    app.keys.verify(token)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: i32, is_admin: bool) -> user::Model {
    let now = Utc::now().naive_utc();
    user::Model {
      id,
      email: "a@b.c".into(),
      username: None,
      full_name: None,
      password_hash: String::new(),
      is_active: true,
      is_admin,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn token_round_trip_keeps_identity() {
    let keys = Keys::new("secret", Duration::from_secs(3600));
    let token = keys.issue(&user(7, true)).unwrap();
    assert_eq!(keys.verify(&token).unwrap(), Caller::administrator(7));
  }

  #[test]
  fn foreign_and_expired_tokens_are_rejected() {
    let keys = Keys::new("secret", Duration::from_secs(3600));
    let other = Keys::new("other", Duration::from_secs(3600));
    let token = other.issue(&user(7, false)).unwrap();
    assert!(matches!(keys.verify(&token), Err(Error::Token(_))));

    let stale = Claims { sub: 7, admin: false, exp: 1_000 };
    let token = jsonwebtoken::encode(
      &Header::default(),
      &stale,
      &EncodingKey::from_secret(b"secret"),
    )
    .unwrap();
    assert!(keys.verify(&token).is_err());
  }

  #[test]
  fn password_hash_verifies_only_its_password() {
    let hash = hash_password("hunter22").unwrap();
    assert!(verify_password("hunter22", &hash));
    assert!(!verify_password("hunter23", &hash));
    assert!(!verify_password("hunter22", "not-a-phc-string"));
  }

  #[test]
  fn admin_gate() {
    assert!(Caller::administrator(1).admin().is_ok());
    assert!(matches!(Caller::user(1).admin(), Err(Error::Forbidden(_))));
  }
}
