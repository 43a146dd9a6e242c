// app/src/services/account_service.rs

//! Sign-up, sign-in and the startup admin grant.

use crate::errors::{AppError, Result as AppResult};
use crate::services::auth_service;
use launchcraft::models::{Account, Profile, ADMIN_ROLE};
use launchcraft::{Session, SessionRegistry, SessionToken, Store};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

fn normalize_email(email: &str) -> AppResult<String> {
  let email = email.trim();
  if email.is_empty() || !email.contains('@') {
    warn!("Invalid email format provided.");
    return Err(AppError::Validation("Valid email is required.".to_string()));
  }
  Ok(email.to_string())
}

/// Creates an account with a hashed password and its initial profile.
#[instrument(name = "account_service::signup", skip(store, password, full_name), err(Display))]
pub async fn signup(
  store: &dyn Store,
  email: &str,
  password: &str,
  full_name: Option<String>,
) -> AppResult<Account> {
  let email = normalize_email(email)?;
  let password_hash = auth_service::hash_password(password)?;
  let account = store.create_account(&email, &password_hash).await?;

  let mut profile = Profile::blank(account.id, &account.email, account.created_at);
  profile.full_name = full_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
  store
    .upsert_profile(profile)
    .await
    .map_err(AppError::during("Account created but the profile could not be saved"))?;

  info!(user_id = %account.id, "Account created.");
  Ok(account)
}

/// Verifies credentials and opens a session.
///
/// Unknown emails and wrong passwords produce the same error.
#[instrument(name = "account_service::signin", skip(store, sessions, password), err(Display))]
pub async fn signin(
  store: &dyn Store,
  sessions: &SessionRegistry,
  email: &str,
  password: &str,
) -> AppResult<(SessionToken, Arc<Session>)> {
  let email = normalize_email(email)?;
  let account = match store.find_account_by_email(&email).await? {
    Some(account) => account,
    None => {
      warn!("Sign-in attempt for an unknown email.");
      return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }
  };

  if !auth_service::verify_password(&account.password_hash, password)? {
    warn!(user_id = %account.id, "Sign-in attempt with a wrong password.");
    return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
  }

  let opened = sessions.open(&account).await?;
  info!(user_id = %account.id, "Signin successful.");
  Ok(opened)
}

/// Grants the admin role to the account registered under `email`, if there is one.
/// Returns whether the account exists.
#[instrument(name = "account_service::grant_admin", skip(store), err(Display))]
pub async fn grant_admin(store: &dyn Store, email: &str) -> AppResult<bool> {
  match store.find_account_by_email(email).await? {
    Some(account) => {
      store.insert_role(account.id, ADMIN_ROLE).await?;
      info!(user_id = %account.id, "Admin role granted at startup.");
      Ok(true)
    }
    None => {
      warn!("ADMIN_EMAIL does not match any account yet.");
      Ok(false)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use launchcraft::MemoryStore;

  #[actix_rt::test]
  async fn signup_then_signin_opens_a_session() {
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionRegistry::new(store.clone());

    let account = signup(store.as_ref(), " ada@example.com ", "long enough", Some("Ada".into()))
      .await
      .unwrap();
    assert_eq!(account.email, "ada@example.com");
    let profile = store.fetch_profile(account.id).await.unwrap().unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Ada"));

    let (token, session) = signin(store.as_ref(), &sessions, "ADA@example.com", "long enough")
      .await
      .unwrap();
    assert_eq!(session.user_id, account.id);
    assert!(!session.is_admin);
    assert!(sessions.get(&token).is_some());
  }

  #[actix_rt::test]
  async fn bad_credentials_are_indistinguishable() {
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionRegistry::new(store.clone());
    signup(store.as_ref(), "ada@example.com", "long enough", None).await.unwrap();

    let wrong_password = signin(store.as_ref(), &sessions, "ada@example.com", "not it at all").await;
    let unknown_email = signin(store.as_ref(), &sessions, "bob@example.com", "long enough").await;
    for result in [wrong_password, unknown_email] {
      match result {
        Err(AppError::Auth(m)) => assert_eq!(m, INVALID_CREDENTIALS),
        other => panic!("expected an auth error, got {:?}", other.map(|(t, _)| t)),
      }
    }
    assert_eq!(sessions.active_sessions(), 0);
  }

  #[actix_rt::test]
  async fn signup_validates_input_and_uniqueness() {
    let store = MemoryStore::new();
    assert!(matches!(
      signup(&store, "no-at-sign", "long enough", None).await,
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      signup(&store, "ada@example.com", "short", None).await,
      Err(AppError::Validation(_))
    ));
    signup(&store, "ada@example.com", "long enough", None).await.unwrap();
    assert!(matches!(
      signup(&store, "Ada@Example.com", "long enough", None).await,
      Err(AppError::Core(launchcraft::Error::Validation(_)))
    ));
  }

  #[actix_rt::test]
  async fn grant_admin_matches_existing_accounts_only() {
    let store = MemoryStore::new();
    assert!(!grant_admin(&store, "root@example.com").await.unwrap());
    let account = signup(&store, "root@example.com", "long enough", None).await.unwrap();
    assert!(grant_admin(&store, "root@example.com").await.unwrap());
    assert!(grant_admin(&store, "root@example.com").await.unwrap());
    assert_eq!(store.list_roles(account.id).await.unwrap().len(), 1);
  }
}
