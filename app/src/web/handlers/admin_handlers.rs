// app/src/web/handlers/admin_handlers.rs

//! Admin panel endpoints. Every mutation answers with its notice plus the re-fetched overview;
//! `stale` is set when the mutation landed but the re-fetch did not.

use actix_web::{web, HttpResponse};
use launchcraft::models::{NewProduct, OrderStatus};
use launchcraft::MutationOutcome;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AdminUser;

fn outcome_response(outcome: MutationOutcome) -> HttpResponse {
  HttpResponse::Ok().json(outcome)
}

#[instrument(name = "handler::admin_overview", skip(app_state, admin), fields(admin_id = %admin.session.user_id))]
pub async fn overview_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
) -> Result<HttpResponse, AppError> {
  let overview = app_state
    .admin
    .refresh()
    .await
    .map_err(AppError::during("Failed to load admin data"))?;
  Ok(HttpResponse::Ok().json(json!({ "overview": overview })))
}

#[instrument(name = "handler::toggle_admin", skip(app_state, admin, path), fields(admin_id = %admin.session.user_id))]
pub async fn toggle_admin_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let target = path.into_inner();
  let outcome = app_state
    .admin
    .toggle_user_role(target)
    .await
    .map_err(AppError::during("Failed to update user role"))?;
  info!(%target, "Admin toggled a user's role.");
  Ok(outcome_response(outcome))
}

#[instrument(name = "handler::toggle_product_status", skip(app_state, admin, path), fields(admin_id = %admin.session.user_id))]
pub async fn toggle_product_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state
    .admin
    .toggle_product_status(path.into_inner())
    .await
    .map_err(AppError::during("Failed to update product status"))?;
  Ok(outcome_response(outcome))
}

#[instrument(name = "handler::create_product", skip(app_state, admin, req_payload), fields(admin_id = %admin.session.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state
    .admin
    .create_product(req_payload.into_inner())
    .await
    .map_err(AppError::during("Failed to create product"))?;
  Ok(HttpResponse::Created().json(outcome))
}

#[derive(Deserialize, Debug)]
pub struct OrderStatusPayload {
  pub status: OrderStatus,
}

#[instrument(name = "handler::set_order_status", skip(app_state, admin, path), fields(admin_id = %admin.session.user_id))]
pub async fn set_order_status_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<OrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state
    .admin
    .set_order_status(path.into_inner(), req_payload.status)
    .await
    .map_err(AppError::during("Failed to update order status"))?;
  Ok(outcome_response(outcome))
}
