// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Where the storefront keeps its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" => Ok(StoreBackend::Postgres),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub store_backend: StoreBackend,
  /// Required for the postgres backend only.
  pub database_url: Option<String>,
  pub seed_db: bool,
  /// Artificial latency of the contact form submission.
  pub lead_submit_delay: Duration,
  /// Account granted the admin role at startup, if it exists.
  pub admin_email: Option<String>,
  /// How long a sign-in stays valid.
  pub session_ttl: Duration,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;

    let store_backend = get_env("STORE_BACKEND")
      .unwrap_or_else(|_| "postgres".to_string())
      .parse::<StoreBackend>()?;
    let database_url = match store_backend {
      StoreBackend::Postgres => Some(get_env("DATABASE_URL")?),
      StoreBackend::Memory => get_env("DATABASE_URL").ok(),
    };

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    let lead_submit_delay = get_env("LEAD_SUBMIT_DELAY_MS")
      .unwrap_or_else(|_| "1000".to_string())
      .parse::<u64>()
      .map(Duration::from_millis)
      .map_err(|e| AppError::Config(format!("Invalid LEAD_SUBMIT_DELAY_MS: {}", e)))?;

    let admin_email = get_env("ADMIN_EMAIL").ok().filter(|v| !v.trim().is_empty());

    let session_ttl = get_env("SESSION_TTL_MINUTES")
      .unwrap_or_else(|_| "1440".to_string())
      .parse::<u64>()
      .map(|minutes| Duration::from_secs(minutes * 60))
      .map_err(|e| AppError::Config(format!("Invalid SESSION_TTL_MINUTES: {}", e)))?;

    tracing::info!(?store_backend, seed_db, "Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      database_url,
      seed_db,
      lead_submit_delay,
      admin_email,
      session_ttl,
    })
  }

  /// In-process configuration for tests.
  #[cfg(test)]
  pub fn in_memory() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      store_backend: StoreBackend::Memory,
      database_url: None,
      seed_db: false,
      lead_submit_delay: Duration::ZERO,
      admin_email: None,
      session_ttl: launchcraft::DEFAULT_SESSION_TTL,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  const VARS: [&str; 8] = [
    "SERVER_HOST",
    "SERVER_PORT",
    "STORE_BACKEND",
    "DATABASE_URL",
    "SEED_DB",
    "LEAD_SUBMIT_DELAY_MS",
    "ADMIN_EMAIL",
    "SESSION_TTL_MINUTES",
  ];

  fn with_env(pairs: &[(&str, &str)]) -> Result<AppConfig> {
    for var in VARS {
      env::remove_var(var);
    }
    for (key, value) in pairs {
      env::set_var(key, value);
    }
    let config = AppConfig::from_env();
    for var in VARS {
      env::remove_var(var);
    }
    config
  }

  #[test]
  #[serial]
  fn memory_backend_needs_no_database_url() {
    let config = with_env(&[("STORE_BACKEND", "memory")]).unwrap();
    assert_eq!(config.store_backend, StoreBackend::Memory);
    assert_eq!(config.server_port, 8080);
    assert_eq!(config.lead_submit_delay, Duration::from_millis(1000));
    assert!(config.database_url.is_none());
    assert!(config.admin_email.is_none());
    assert_eq!(config.session_ttl, Duration::from_secs(24 * 60 * 60));
  }

  #[test]
  #[serial]
  fn postgres_backend_requires_database_url() {
    let missing = with_env(&[("STORE_BACKEND", "postgres")]);
    assert!(matches!(missing, Err(AppError::Config(_))));

    let config = with_env(&[
      ("DATABASE_URL", "postgres://localhost/launchcraft"),
      ("SEED_DB", "true"),
      ("LEAD_SUBMIT_DELAY_MS", "250"),
      ("ADMIN_EMAIL", "founder@example.com"),
      ("SESSION_TTL_MINUTES", "30"),
    ])
    .unwrap();
    assert_eq!(config.store_backend, StoreBackend::Postgres);
    assert!(config.seed_db);
    assert_eq!(config.lead_submit_delay, Duration::from_millis(250));
    assert_eq!(config.admin_email.as_deref(), Some("founder@example.com"));
    assert_eq!(config.session_ttl, Duration::from_secs(30 * 60));
  }

  #[test]
  #[serial]
  fn malformed_values_are_config_errors() {
    for pairs in [
      vec![("STORE_BACKEND", "memory"), ("SERVER_PORT", "eighty")],
      vec![("STORE_BACKEND", "memory"), ("SEED_DB", "maybe")],
      vec![("STORE_BACKEND", "sqlite")],
      vec![("STORE_BACKEND", "memory"), ("LEAD_SUBMIT_DELAY_MS", "-5")],
      vec![("STORE_BACKEND", "memory"), ("SESSION_TTL_MINUTES", "forever")],
    ] {
      assert!(matches!(with_env(&pairs), Err(AppError::Config(_))));
    }
  }
}
