//! Error conversions
//!
//! `From` implementations for store errors and the HTTP rendering of
//! [`AppError`]. Both are feature-gated so the kernel stays framework-free.

#[cfg(any(feature = "sqlx", feature = "axum"))]
use super::app_error::AppError;

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx(&err).with_source(err)
    }
}

/// Map a sqlx error to the matching [`AppError`] without consuming it.
///
/// Connection-level failures become 503 so callers know a retry may succeed.
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> AppError {
    match err {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            AppError::service_unavailable("Database connection pool exhausted")
                .with_action("Retry the request")
        }
        sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error")
            .with_action("Retry the request"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            // https://www.postgresql.org/docs/current/errcodes-appendix.html
            Some("23505") => AppError::conflict("Duplicate key value"),
            Some("23503") => AppError::conflict("Foreign key violation"),
            Some("42501") => AppError::forbidden("Insufficient privilege"),
            Some("40001") | Some("40P01") => {
                AppError::service_unavailable("Concurrent update, transaction aborted")
                    .with_action("Retry the request")
            }
            Some(code) if code.starts_with("53") || code.starts_with("57") => {
                AppError::service_unavailable("Database unavailable")
                    .with_action("Retry the request")
            }
            _ => AppError::internal("Database error"),
        },
        _ => AppError::internal("Database error"),
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "sqlx"))]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_pool_timeout_is_retryable() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert!(err.action().is_some());
    }

    #[test]
    fn test_row_not_found() {
        let err = classify_sqlx(&sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
