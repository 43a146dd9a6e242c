// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Store operation '{operation}' failed. Source: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: AnyhowError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Unauthorized(String),

    #[error("Not permitted: {0}")]
    Forbidden(String),
}

impl Error {
    /// Wraps a backend failure, tagging it with the store operation that raised it.
    pub fn store(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
        Error::Store {
            operation,
            source: source.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }
}

// Errors raised by store implementations as anyhow values end up here.
impl From<AnyhowError> for Error {
    fn from(err: AnyhowError) -> Self {
        match err.downcast::<Error>() {
            Ok(inner) => inner,
            Err(err) => Error::Store {
                operation: "unknown",
                source: err,
            },
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
