// app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use launchcraft::models::Product;
use launchcraft::{CatalogFilter, CatalogFilterParams};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

// Card helpers rendered alongside each product.
fn product_card(product: &Product) -> serde_json::Value {
  let preview = product.feature_preview();
  json!({
      "product": product,
      "stageLabel": product.stage.label(),
      "featurePreview": preview.shown,
      "moreFeatures": preview.remaining,
      "stackPreview": product.stack_preview(),
  })
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<CatalogFilterParams>,
) -> Result<HttpResponse, AppError> {
  let filter = CatalogFilter::try_from(query_params.into_inner())?;
  let page = app_state
    .catalog
    .browse(&filter)
    .await
    .map_err(AppError::during("Failed to load products"))?;

  info!(shown = page.products.len(), available = page.total_available, "Catalog page served.");
  let cards: Vec<_> = page.products.iter().map(product_card).collect();
  Ok(HttpResponse::Ok().json(json!({
      "products": cards,
      "categories": page.categories,
      "totalAvailable": page.total_available,
      "noResults": page.no_results,
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product = app_state
    .catalog
    .product(path.into_inner())
    .await
    .map_err(AppError::during("Failed to load product"))?;
  Ok(HttpResponse::Ok().json(product_card(&product)))
}

#[instrument(name = "handler::list_categories", skip(app_state))]
pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = app_state
    .store
    .list_categories()
    .await
    .map_err(AppError::during("Failed to load categories"))?;
  Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}
