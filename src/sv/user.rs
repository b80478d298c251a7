use crate::{
  auth,
  entity::{SubmissionStatus, submission, user},
  model::{RegisterReq, UserStats},
  prelude::*,
};

const MIN_PASSWORD_LEN: usize = 8;

pub struct User<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> User<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  pub async fn register(
    &self,
    req: RegisterReq,
    is_admin: bool,
  ) -> Result<user::Model> {
    let email = req
      .email
      .map(|email| email.trim().to_lowercase())
      .filter(|email| !email.is_empty());
    let (Some(email), Some(password)) = (email, req.password) else {
      return Err(Error::invalid("email and password are required"));
    };
    if !email.contains('@') {
      return Err(Error::invalid("Invalid email"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
      return Err(Error::invalid(format!(
        "Password must be at least {MIN_PASSWORD_LEN} characters"
      )));
    }

    let now = utils::now();
    let user = user::ActiveModel {
      id: NotSet,
      email: Set(email),
      username: Set(req.username.filter(|s| !s.trim().is_empty())),
      full_name: Set(req.full_name.filter(|s| !s.trim().is_empty())),
      password_hash: Set(auth::hash_password(&password)?),
      is_active: Set(true),
      is_admin: Set(is_admin),
      created_at: Set(now),
      updated_at: Set(now),
    };

    let user = user
      .insert(self.db)
      .await
      .map_err(|err| Error::on_conflict(err, "Email already registered"))?;

    info!("Registered user {} (admin: {})", user.id, user.is_admin);
    Ok(user)
  }

  pub async fn login(&self, email: &str, password: &str) -> Result<user::Model> {
    let user = user::Entity::find()
      .filter(user::Column::Email.eq(email.trim().to_lowercase()))
      .one(self.db)
      .await?
      .ok_or(Error::InvalidCredentials)?;

    if !auth::verify_password(password, &user.password_hash) {
      return Err(Error::InvalidCredentials);
    }
    if !user.is_active {
      return Err(Error::Forbidden("Account inactive"));
    }

    Ok(user)
  }

  pub async fn by_id(&self, id: i32) -> Result<user::Model> {
    user::Entity::find_by_id(id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("User"))
  }

  /// Totals over every submission of the user.
  pub async fn stats(&self, id: i32) -> Result<UserStats> {
    let submissions = submission::Entity::find()
      .filter(submission::Column::UserId.eq(id))
      .all(self.db)
      .await?;

    let mut stats = UserStats::default();
    for sub in submissions {
      stats.total_submissions += 1;
      match sub.status {
        SubmissionStatus::Pending => stats.pending_submissions += 1,
        SubmissionStatus::Rejected => stats.rejected_submissions += 1,
        SubmissionStatus::Approved => {
          stats.approved_submissions += 1;
          stats.total_earnings =
            stats.total_earnings.saturating_add(sub.earnings);
          stats.total_views = stats.total_views.saturating_add(sub.views);
        }
      }
    }

    Ok(stats)
  }
}

#[cfg(test)]
mod tests {
  use json::json;

  use super::*;
  use crate::{
    money::Cents,
    sv::testing::{self, setup_test_db},
  };

  fn req(email: &str, password: &str) -> RegisterReq {
    RegisterReq {
      email: Some(email.into()),
      password: Some(password.into()),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn test_register_and_login() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    let user = sv.register(req("Creator@Mail.com", "password123"), false).await.unwrap();
    assert_eq!(user.email, "creator@mail.com");
    assert!(!user.is_admin);
    assert_ne!(user.password_hash, "password123");

    let logged = sv.login("CREATOR@mail.com", "password123").await.unwrap();
    assert_eq!(logged.id, user.id);

    assert!(matches!(
      sv.login("creator@mail.com", "wrong-password").await,
      Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
      sv.login("nobody@mail.com", "password123").await,
      Err(Error::InvalidCredentials)
    ));
  }

  #[tokio::test]
  async fn test_duplicate_email_conflicts() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    sv.register(req("a@b.io", "password123"), false).await.unwrap();
    assert!(matches!(
      sv.register(req("A@B.io", "password456"), false).await,
      Err(Error::AlreadyExists(_))
    ));
  }

  #[tokio::test]
  async fn test_register_validation() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    assert!(matches!(
      sv.register(req("a@b.io", "short"), false).await,
      Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
      sv.register(RegisterReq::default(), false).await,
      Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
      sv.register(req("not-an-email", "password123"), false).await,
      Err(Error::InvalidArgument(_))
    ));
  }

  #[tokio::test]
  async fn test_inactive_user_cannot_login() {
    let db = setup_test_db().await;
    let sv = User::new(&db);

    let user = sv.register(req("a@b.io", "password123"), false).await.unwrap();
    user::ActiveModel { is_active: Set(false), ..user.into() }
      .update(&db)
      .await
      .unwrap();

    assert!(matches!(
      sv.login("a@b.io", "password123").await,
      Err(Error::Forbidden(_))
    ));
    // a wrong password says nothing about the account state
    assert!(matches!(
      sv.login("a@b.io", "wrong-password").await,
      Err(Error::InvalidCredentials)
    ));
  }

  #[tokio::test]
  async fn test_stats_totals() {
    let db = setup_test_db().await;
    let admin = testing::admin(&db).await;
    let campaign = testing::campaign(&db, &admin, json!({})).await;
    let creator = testing::user(&db, "c@mail.io").await;

    let rows = [
      (SubmissionStatus::Approved, Cents(10), i64::MAX),
      (SubmissionStatus::Approved, Cents(20), 5),
      (SubmissionStatus::Rejected, Cents::ZERO, 0),
      (SubmissionStatus::Pending, Cents::ZERO, 0),
    ];
    for (status, earnings, views) in rows {
      submission::ActiveModel {
        id: NotSet,
        campaign_id: Set(campaign.id),
        user_id: Set(creator.id),
        accounts: Set(json!(["ig:creator"])),
        reel_url: Set("u/1".into()),
        metadata: Set(None),
        status: Set(status),
        earnings: Set(earnings),
        views: Set(views),
        created_at: Set(utils::now()),
        reviewed_at: Set(None),
      }
      .insert(&db)
      .await
      .unwrap();
    }

    let stats = User::new(&db).stats(creator.id).await.unwrap();
    assert_eq!(stats.total_submissions, 4);
    assert_eq!(stats.approved_submissions, 2);
    assert_eq!(stats.pending_submissions, 1);
    assert_eq!(stats.rejected_submissions, 1);
    assert_eq!(stats.total_earnings, Cents(30));
    assert_eq!(stats.total_views, i64::MAX);
  }
}
