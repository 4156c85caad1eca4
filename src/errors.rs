//! Unified error type for the service and HTTP layers.
//!
//! Domain failures (`NotFound`, `Conflict`, `Validation`) carry enough data to
//! build the response envelope; everything else is treated as an internal error.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// An id lookup missed
    #[error("{entity} not found")]
    NotFound {
        /// Human-readable entity name, e.g. `"Customer"`
        entity: &'static str,
        /// The identifier that was requested
        id: String,
    },

    /// A uniqueness or relational constraint would be violated
    #[error("{message}")]
    Conflict {
        /// Description of the conflicting state
        message: String,
    },

    /// One or more input fields failed their constraints
    #[error("Validation failed")]
    Validation {
        /// One entry per failed field check
        errors: Vec<String>,
    },

    /// A sum of transaction amounts does not fit in `i64` cents
    #[error("Transaction total exceeds the supported range")]
    AmountOverflow,

    /// Missing or wrong HTTP Basic credentials
    #[error("Invalid authentication credentials")]
    Unauthorized,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Builds a `NotFound` for `entity` with the given identifier.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a `Conflict` with the given message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Machine-readable error code used in the response envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::Conflict { .. } | Self::AmountOverflow => "RESOURCE_CONFLICT",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Config { .. } | Self::Database(_) | Self::Io(_) | Self::EnvVar(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Detail lines for the envelope's `errors` field.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::NotFound { entity, id } => vec![format!("{entity} with id '{id}' not found")],
            Self::Validation { errors } => errors.clone(),
            _ => Vec::new(),
        }
    }

    /// Translates a failed write into a domain error.
    ///
    /// Unique and foreign-key violations become `Conflict { message }`; every other
    /// database error is passed through untouched.
    #[must_use]
    pub fn from_write(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!("Unique constraint violated: {}", detail);
                Self::conflict(message)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::warn!("Foreign key constraint violated: {}", detail);
                Self::conflict(message)
            }
            _ => Self::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(value: validator::ValidationErrors) -> Self {
        Self::Validation {
            errors: crate::validation::describe(&value),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
