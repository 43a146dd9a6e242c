// app/src/main.rs

mod config;
mod db;
mod errors;
mod services;
mod state;
mod web;

use crate::config::{AppConfig, StoreBackend};
use crate::db::PgStore;
use crate::errors::{AppError, Result as AppResult};
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use launchcraft::{MemoryStore, Store};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

async fn build_store(config: &AppConfig) -> AppResult<Arc<dyn Store>> {
  match config.store_backend {
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; data is lost on restart.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
      let pool = PgPool::connect(url).await?;
      tracing::info!("Successfully connected to the database.");
      db::apply_schema(&pool).await?;
      Ok(Arc::new(PgStore::new(pool)))
    }
  }
}

async fn prepare_store(config: &AppConfig) -> AppResult<Arc<dyn Store>> {
  let store = build_store(config).await?;

  if config.seed_db {
    db::seed::seed_demo_catalog(store.as_ref()).await?;
  }
  if let Some(email) = &config.admin_email {
    services::account_service::grant_admin(store.as_ref(), email).await?;
  }
  Ok(store)
}

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(log_filter())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting LaunchCraft storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
    }
  };

  let store = match prepare_store(&app_config).await {
    Ok(store) => store,
    Err(e) => {
      tracing::error!(error = %e, "Failed to prepare the store.");
      return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }
  };

  let app_state = AppState::new(store, app_config.clone());

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
