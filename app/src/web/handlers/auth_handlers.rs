// app/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::account_service;
use crate::state::AppState;
use crate::web::extractors::{bearer_token, AuthenticatedUser};

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub full_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(name = "handler::signup", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let account = account_service::signup(
    app_state.store.as_ref(),
    &payload.email,
    &payload.password,
    payload.full_name,
  )
  .await?;

  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "userId": account.id,
      "email": account.email,
  })))
}

#[instrument(name = "handler::signin", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (token, session) = account_service::signin(
    app_state.store.as_ref(),
    &app_state.sessions,
    &req_payload.email,
    &req_payload.password,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Signin successful.",
      "userId": session.user_id,
      "email": session.email,
      "isAdmin": session.is_admin,
      "token": token,
  })))
}

/// Ends the caller's session. A missing or unknown token still succeeds.
#[instrument(name = "handler::signout", skip(app_state, req))]
pub async fn signout_handler(app_state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
  let closed = bearer_token(&req)
    .map(|token| app_state.sessions.close(&token))
    .unwrap_or(false);
  info!(closed, "Signout processed.");
  HttpResponse::Ok().json(json!({ "message": "Signed out." }))
}

#[instrument(name = "handler::me", skip(auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn me_handler(auth_user: AuthenticatedUser) -> HttpResponse {
  HttpResponse::Ok().json(json!({ "session": auth_user.session }))
}
