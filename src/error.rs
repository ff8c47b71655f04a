use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application error taxonomy. Precondition failures surface before any
/// mutation runs; once a mutation begins it either fully commits or fully
/// aborts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The actor lacks the capability, role, or group the operation needs.
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),

    /// The request conflicts with current workflow state (chief already
    /// assigned, duplicate report, mismatched report sections, ...).
    #[error("{0}")]
    InvalidState(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// An invitation token failed verification (tamper, scope, expiry).
    #[error("invalid or expired invitation token")]
    InvalidToken,

    /// Missing or undecodable bearer credentials.
    #[error("authentication required")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Error::PermissionDenied(_) => {
                (StatusCode::FORBIDDEN, "PERMISSION_DENIED", self.to_string())
            }
            Error::InvalidState(msg) => (StatusCode::CONFLICT, "INVALID_STATE", msg.clone()),
            Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            Error::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", self.to_string()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            Error::Database(err) => classify_sqlx_error(err),
            Error::Template(err) => {
                tracing::error!("Template error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

/// Map a sqlx error onto the HTTP surface. Unique-constraint violations on
/// our `uq_*` constraints are caller conflicts, not server faults.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!("Database error: {}", db_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!("Database error: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
