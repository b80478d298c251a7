use sea_orm::sea_query::OnConflict;

use crate::{
  auth::Caller,
  entity::{AccountStatus, connected_account},
  model::VerificationReq,
  prelude::*,
};

pub struct Account<'a> {
  db: &'a DatabaseConnection,
}

fn required(value: Option<String>, name: &str) -> Result<String> {
  value
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| Error::invalid(format!("{name} is required")))
}

impl<'a> Account<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Starts (or restarts) verification of the caller's profile on a
  /// platform. One row per (user, platform): a repeated request
  /// overwrites the profile, issues a new code and resets the status.
  pub async fn initiate_verification(
    &self,
    caller: &Caller,
    req: VerificationReq,
  ) -> Result<connected_account::Model> {
    let platform = required(req.platform, "platform")?;
    let username = required(req.username, "username")?;
    let profile_url = required(req.profile_url, "profileUrl")?;

    let followers_count = match req.followers_count {
      None | Some(json::Value::Null) => 0,
      Some(value) => utils::integer(&value)
        .filter(|n| *n >= 0)
        .ok_or_else(|| {
          Error::invalid("followersCount must be a non-negative integer")
        })?,
    };

    let now = utils::now();
    let code = utils::verification_code();
    let account = connected_account::ActiveModel {
      id: NotSet,
      user_id: Set(caller.user_id),
      platform: Set(platform.clone()),
      username: Set(username),
      profile_url: Set(profile_url),
      followers_count: Set(followers_count),
      engagement_rate: Set(None),
      last_synced_at: Set(None),
      status: Set(AccountStatus::Pending),
      verification_code: Set(code),
      created_at: Set(now),
      updated_at: Set(now),
    };

    connected_account::Entity::insert(account)
      .on_conflict(
        OnConflict::columns([
          connected_account::Column::UserId,
          connected_account::Column::Platform,
        ])
        .update_columns([
          connected_account::Column::Username,
          connected_account::Column::ProfileUrl,
          connected_account::Column::FollowersCount,
          connected_account::Column::VerificationCode,
          connected_account::Column::Status,
          connected_account::Column::UpdatedAt,
        ])
        .to_owned(),
      )
      .exec(self.db)
      .await?;

    let account = connected_account::Entity::find()
      .filter(connected_account::Column::UserId.eq(caller.user_id))
      .filter(connected_account::Column::Platform.eq(platform.as_str()))
      .one(self.db)
      .await?
      .ok_or_else(|| Error::Internal("Upserted account vanished".into()))?;

    info!(
      "Verification of {} account {} started for user {}",
      account.platform, account.id, caller.user_id
    );
    Ok(account)
  }

  pub async fn by_user(
    &self,
    user_id: i32,
  ) -> Result<Vec<connected_account::Model>> {
    Ok(
      connected_account::Entity::find()
        .filter(connected_account::Column::UserId.eq(user_id))
        .order_by_desc(connected_account::Column::CreatedAt)
        .order_by_desc(connected_account::Column::Id)
        .all(self.db)
        .await?,
    )
  }

  /// Removes an account only if `user_id` owns it.
  pub async fn delete(&self, account_id: i32, user_id: i32) -> Result<()> {
    let res = connected_account::Entity::delete_many()
      .filter(connected_account::Column::Id.eq(account_id))
      .filter(connected_account::Column::UserId.eq(user_id))
      .exec(self.db)
      .await?;

    if res.rows_affected == 0 {
      return Err(Error::NotFound("Account"));
    }

    debug!("Account {account_id} of user {user_id} removed");
    Ok(())
  }

  pub async fn set_status(
    &self,
    caller: &Caller,
    account_id: i32,
    status: AccountStatus,
  ) -> Result<connected_account::Model> {
    caller.admin()?;
    if status == AccountStatus::Pending {
      return Err(Error::invalid("Status must be verified or failed"));
    }

    let account = connected_account::Entity::find_by_id(account_id)
      .one(self.db)
      .await?
      .ok_or(Error::NotFound("Account"))?;

    let now = utils::now();
    let account = connected_account::ActiveModel {
      status: Set(status),
      last_synced_at: Set(Some(now)),
      updated_at: Set(now),
      ..account.into()
    }
    .update(self.db)
    .await?;

    Ok(account)
  }
}

#[cfg(test)]
mod tests {
  use json::json;

  use super::*;
  use crate::sv::testing::{self, setup_test_db};

  fn req(platform: &str, username: &str, followers: json::Value) -> VerificationReq {
    json::from_value(json!({
      "platform": platform,
      "username": username,
      "profileUrl": format!("https://example.com/{username}"),
      "followersCount": followers,
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn test_initiate_is_an_upsert() {
    let db = setup_test_db().await;
    let creator = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let sv = Account::new(&db);

    let first = sv
      .initiate_verification(&creator, req("instagram", "a", json!(10)))
      .await
      .unwrap();
    assert_eq!(first.status, AccountStatus::Pending);
    assert_eq!(first.followers_count, 10);
    assert!(first.verification_code.starts_with("cp-"));

    let second = sv
      .initiate_verification(&creator, req("instagram", "b", json!("25")))
      .await
      .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.username, "b");
    assert_eq!(second.followers_count, 25);
    assert_ne!(second.verification_code, first.verification_code);

    let all = sv.by_user(creator.user_id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].username, "b");
  }

  #[tokio::test]
  async fn test_reinitiate_resets_status() {
    let db = setup_test_db().await;
    let admin = testing::admin(&db).await;
    let creator = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let sv = Account::new(&db);

    let account = sv
      .initiate_verification(&creator, req("tiktok", "a", json!(null)))
      .await
      .unwrap();
    assert_eq!(account.followers_count, 0);

    let verified = sv
      .set_status(&admin, account.id, AccountStatus::Verified)
      .await
      .unwrap();
    assert_eq!(verified.status, AccountStatus::Verified);
    assert!(verified.last_synced_at.is_some());

    let again = sv
      .initiate_verification(&creator, req("tiktok", "a", json!(5)))
      .await
      .unwrap();
    assert_eq!(again.status, AccountStatus::Pending);
  }

  #[tokio::test]
  async fn test_initiate_validation() {
    let db = setup_test_db().await;
    let creator = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let sv = Account::new(&db);

    for bad in [
      req("", "a", json!(1)),
      req("instagram", " ", json!(1)),
      req("instagram", "a", json!(-3)),
      req("instagram", "a", json!("many")),
      VerificationReq::default(),
    ] {
      assert!(matches!(
        sv.initiate_verification(&creator, bad).await,
        Err(Error::InvalidArgument(_))
      ));
    }
    assert!(sv.by_user(creator.user_id).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_list_newest_first() {
    let db = setup_test_db().await;
    let creator = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let sv = Account::new(&db);

    let a = sv
      .initiate_verification(&creator, req("instagram", "a", json!(1)))
      .await
      .unwrap();
    let b = sv
      .initiate_verification(&creator, req("youtube", "b", json!(1)))
      .await
      .unwrap();

    let ids: Vec<_> =
      sv.by_user(creator.user_id).await.unwrap().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![b.id, a.id]);
  }

  #[tokio::test]
  async fn test_delete_checks_owner() {
    let db = setup_test_db().await;
    let owner = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let stranger = testing::user(&db, "s@mail.io").await;
    let sv = Account::new(&db);

    let account = sv
      .initiate_verification(&owner, req("instagram", "a", json!(1)))
      .await
      .unwrap();

    assert!(matches!(
      sv.delete(account.id, stranger.id).await,
      Err(Error::NotFound(_))
    ));
    assert_eq!(sv.by_user(owner.user_id).await.unwrap().len(), 1);

    sv.delete(account.id, owner.user_id).await.unwrap();
    assert!(sv.by_user(owner.user_id).await.unwrap().is_empty());
    assert!(matches!(
      sv.delete(account.id, owner.user_id).await,
      Err(Error::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn test_set_status_rules() {
    let db = setup_test_db().await;
    let admin = testing::admin(&db).await;
    let creator = Caller::user(testing::user(&db, "c@mail.io").await.id);
    let sv = Account::new(&db);

    let account = sv
      .initiate_verification(&creator, req("instagram", "a", json!(1)))
      .await
      .unwrap();

    assert!(matches!(
      sv.set_status(&creator, account.id, AccountStatus::Verified).await,
      Err(Error::Forbidden(_))
    ));
    assert!(matches!(
      sv.set_status(&admin, account.id, AccountStatus::Pending).await,
      Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
      sv.set_status(&admin, 999, AccountStatus::Failed).await,
      Err(Error::NotFound(_))
    ));
  }
}
