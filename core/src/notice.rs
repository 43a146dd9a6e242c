// core/src/notice.rs

//! User-facing, dismissible notifications.

use serde::Serialize;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
  Default,
  Destructive,
}

/// What the caller shows after an operation: a title and a one-line description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
  pub title: String,
  pub description: String,
  pub variant: NoticeVariant,
}

impl Notice {
  pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
      variant: NoticeVariant::Default,
    }
  }

  pub fn failure(description: impl Into<String>) -> Self {
    Self {
      title: "Error".to_string(),
      description: description.into(),
      variant: NoticeVariant::Destructive,
    }
  }

  /// Collapses an error into a notice, using `fallback` for failures whose detail is internal.
  pub fn from_error(err: &Error, fallback: &str) -> Self {
    match err {
      Error::Store { .. } => Notice::failure(fallback),
      Error::NotFound(m) | Error::Validation(m) | Error::Unauthorized(m) | Error::Forbidden(m) => {
        Notice::failure(m.clone())
      }
    }
  }

  pub fn is_failure(&self) -> bool {
    self.variant == NoticeVariant::Destructive
  }
}
