// app/src/web/extractors.rs

//! Bearer-token extractors. Both only read the session snapshot; no store round trip happens
//! during authentication.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use launchcraft::{Error as CoreError, Session, SessionToken};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub(crate) fn bearer_token(req: &HttpRequest) -> Result<SessionToken, AppError> {
  let value = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or_else(|| {
      warn!("Missing or malformed Authorization header.");
      AppError::Core(CoreError::Unauthorized("Please sign in to continue.".to_string()))
    })?;
  Uuid::parse_str(value.trim())
    .map_err(|_| AppError::Core(CoreError::Unauthorized("Please sign in to continue.".to_string())))
}

fn app_state(req: &HttpRequest) -> Result<&web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let token = bearer_token(req)?;
  let session = app_state(req)?.sessions.require(&token)?;
  Ok(AuthenticatedUser { session })
}

fn authenticate_admin(req: &HttpRequest) -> Result<AdminUser, AppError> {
  let token = bearer_token(req)?;
  let session = app_state(req)?.sessions.require_admin(&token)?;
  Ok(AdminUser { session })
}

/// Any signed-in user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub session: Arc<Session>,
}

impl AuthenticatedUser {
  pub fn user_id(&self) -> Uuid {
    self.session.user_id
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate(req))
  }
}

/// A signed-in user whose session snapshot carries the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser {
  pub session: Arc<Session>,
}

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    ready(authenticate_admin(req))
  }
}
