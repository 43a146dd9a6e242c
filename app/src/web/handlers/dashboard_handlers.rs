// app/src/web/handlers/dashboard_handlers.rs

use actix_web::{web, HttpResponse};
use launchcraft::models::ProfileUpdate;
use launchcraft::{load_dashboard, update_profile, Notice};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::dashboard", skip(app_state, auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn dashboard_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let dashboard = load_dashboard(app_state.store.as_ref(), auth_user.user_id())
    .await
    .map_err(AppError::during("Failed to load dashboard data"))?;
  Ok(HttpResponse::Ok().json(json!({
      "dashboard": dashboard,
      "memberSince": auth_user.session.member_since,
  })))
}

#[instrument(name = "handler::update_profile", skip(app_state, auth_user, req_payload), fields(user_id = %auth_user.user_id()))]
pub async fn update_profile_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ProfileUpdate>,
) -> Result<HttpResponse, AppError> {
  let profile = update_profile(app_state.store.as_ref(), auth_user.user_id(), req_payload.into_inner())
    .await
    .map_err(AppError::during("Failed to update profile"))?;
  Ok(HttpResponse::Ok().json(json!({
      "notice": Notice::success("Success", "Profile updated"),
      "profile": profile,
  })))
}
