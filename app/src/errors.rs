// app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use launchcraft::{Error as CoreError, Notice};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Core(#[from] CoreError),

  /// A core failure with the message shown when its detail is internal.
  #[error("{fallback}: {source}")]
  Operation {
    fallback: &'static str,
    #[source]
    source: CoreError,
  },

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// `map_err` adapter attaching the user-facing fallback message to a core error.
  pub fn during(fallback: &'static str) -> impl FnOnce(CoreError) -> AppError {
    move |source| AppError::Operation { fallback, source }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<CoreError>() {
      Ok(core) => AppError::Core(core),
      Err(err) => match err.downcast::<sqlx::Error>() {
        Ok(db) => AppError::Sqlx(db),
        Err(err) => AppError::Internal(err.to_string()),
      },
    }
  }
}

fn core_status(err: &CoreError) -> StatusCode {
  match err {
    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
    CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
    CoreError::NotFound(_) => StatusCode::NOT_FOUND,
    CoreError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn notice_response(status: StatusCode, notice: Notice) -> HttpResponse {
  HttpResponse::build(status).json(json!({ "error": notice.description, "notice": notice }))
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Core(e) | AppError::Operation { source: e, .. } => core_status(e),
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    let status = self.status_code();
    match self {
      AppError::Core(e) => notice_response(status, Notice::from_error(e, "An internal error occurred")),
      AppError::Operation { fallback, source } => notice_response(status, Notice::from_error(source, fallback)),
      AppError::Validation(m) | AppError::Auth(m) => notice_response(status, Notice::failure(m.clone())),
      AppError::Config(_) => HttpResponse::build(status).json(json!({"error": "Configuration issue"})),
      AppError::Sqlx(_) => HttpResponse::build(status).json(json!({"error": "Database operation failed"})),
      AppError::Internal(_) => HttpResponse::build(status).json(json!({"error": "An internal error occurred"})),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::body::to_bytes;

  #[actix_rt::test]
  async fn store_failures_hide_detail_behind_the_fallback() {
    let err = AppError::during("Failed to update user role")(CoreError::store(
      "insert_role",
      anyhow::anyhow!("connection reset"),
    ));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"], "Failed to update user role");
    assert_eq!(value["notice"]["variant"], "destructive");
    assert!(!body.windows(16).any(|w| w == b"connection reset"));
  }

  #[test]
  fn core_errors_map_to_http_statuses() {
    let cases = [
      (CoreError::validation("bad"), StatusCode::BAD_REQUEST),
      (CoreError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
      (CoreError::Forbidden("no".into()), StatusCode::FORBIDDEN),
      (CoreError::not_found("gone"), StatusCode::NOT_FOUND),
    ];
    for (err, status) in cases {
      assert_eq!(AppError::from(err).status_code(), status);
    }
  }

  #[test]
  fn anyhow_wrapped_core_errors_keep_their_kind() {
    let wrapped = anyhow::Error::new(CoreError::not_found("Product missing"));
    assert!(matches!(AppError::from(wrapped), AppError::Core(CoreError::NotFound(_))));
    assert!(matches!(
      AppError::from(anyhow::anyhow!("boom")),
      AppError::Internal(_)
    ));
  }
}
