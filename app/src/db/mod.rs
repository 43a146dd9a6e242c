// app/src/db/mod.rs

pub mod pg_store;
mod rows;
pub mod seed;

pub use pg_store::PgStore;

use sqlx::PgPool;
use tracing::{info, instrument};

const SCHEMA: &str = include_str!("../../schema.sql");

/// Creates any missing tables. Every statement in the schema is idempotent.
#[instrument(name = "db::apply_schema", skip(pool), err(Display))]
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
  sqlx::raw_sql(SCHEMA).execute(pool).await?;
  info!("Database schema is up to date.");
  Ok(())
}
