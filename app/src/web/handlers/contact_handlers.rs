// app/src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use launchcraft::LeadForm;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::services::lead_intake;
use crate::state::AppState;

#[instrument(name = "handler::contact", skip(app_state, req_payload))]
pub async fn contact_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LeadForm>,
) -> Result<HttpResponse, AppError> {
  let notice = lead_intake::submit_lead(req_payload.into_inner(), app_state.config.lead_submit_delay)
    .await
    .map_err(AppError::during("Failed to send message. Please try again."))?;
  Ok(HttpResponse::Ok().json(json!({ "notice": notice })))
}
