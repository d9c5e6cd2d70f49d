//! Caller-visible failures for catalog and account operations
//!
//! Repositories return plain `sqlx::Error`; the engine and services translate
//! those into [`CatalogError`] so the GraphQL layer can attach a stable
//! `code` extension to every error it surfaces.

use async_graphql::ErrorExtensions;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Identity-based lookup, update or delete missed
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Malformed filter/sort/pagination or input arguments
    #[error("validation error: {0}")]
    Validation(String),

    /// Operation requires a resolved caller identity
    #[error("Not authenticated")]
    Unauthenticated,

    /// Login with an unknown username or a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unique key violation (category name, username)
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Map a failed insert to `Conflict` when it hit a UNIQUE constraint.
    pub fn unique_or_database(err: sqlx::Error, message: impl Into<String>) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Conflict(message.into())
            }
            _ => Self::Database(err),
        }
    }

    /// Machine-readable code exposed as the GraphQL `code` extension
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::Validation(_) => "VALIDATION_ERROR",
            CatalogError::Unauthenticated => "UNAUTHENTICATED",
            CatalogError::InvalidCredentials => "INVALID_CREDENTIALS",
            CatalogError::Conflict(_) => "CONFLICT",
            CatalogError::Database(_) | CatalogError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        let message = match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Database failure while serving request");
                "Internal server error".to_string()
            }
            CatalogError::Internal(e) => {
                tracing::error!(error = %e, "Internal failure while serving request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}
