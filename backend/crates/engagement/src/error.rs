//! Engagement Error Types
//!
//! Engagement-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::classify_sqlx, kind::ErrorKind};
use thiserror::Error;

pub type EngagementResult<T> = Result<T, EngagementError>;

#[derive(Debug, Error)]
pub enum EngagementError {
    /// Username does not resolve to a published profile
    #[error("Profile not found")]
    ProfileNotFound,

    /// Username fails the canonical username rules
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    /// The counter store cannot serve requests right now
    #[error("Counter store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngagementError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngagementError::ProfileNotFound => ErrorKind::NotFound,
            EngagementError::InvalidUsername(_) => ErrorKind::BadRequest,
            EngagementError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            EngagementError::Database(e) => classify_sqlx(e).kind(),
            EngagementError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Whether the same request may succeed if sent again.
    ///
    /// Only meaningful for idempotent operations: a toggle must be preceded
    /// by a stats read before retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ServiceUnavailable
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            // Keep driver details out of the response body
            EngagementError::Database(e) => classify_sqlx(e),
            EngagementError::StoreUnavailable(_) => {
                AppError::service_unavailable("Counter store unavailable")
                    .with_action("Retry the request")
            }
            EngagementError::Internal(_) => AppError::internal("Internal error"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            EngagementError::Database(e) => {
                tracing::error!(error = %e, "Engagement database error");
            }
            EngagementError::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Engagement store unavailable");
            }
            EngagementError::Internal(msg) => {
                tracing::error!(message = %msg, "Engagement internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Engagement error");
            }
        }
    }
}

impl From<EngagementError> for AppError {
    fn from(err: EngagementError) -> Self {
        err.to_app_error()
    }
}

impl IntoResponse for EngagementError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
