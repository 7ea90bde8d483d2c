use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use newhire_core::cookie;
use newhire_core::error::CoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
/// Session failures (`SESSION_REQUIRED` and status-based `UNAUTHORIZED`)
/// additionally instruct the client to clear the employee session cookie.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `newhire_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A failure in the email collaborator.
    #[error("Email error: {0}")]
    Email(#[from] newhire_mailer::EmailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body, clear_session_cookie) = classify(&self);
        let mut response = (status, axum::Json(body)).into_response();
        if clear_session_cookie {
            if let Ok(value) = cookie::clear().parse() {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

/// Map an error to (status, JSON body, clear-employee-cookie?).
fn classify(err: &AppError) -> (StatusCode, Value, bool) {
    match err {
        AppError::Core(core) => match core {
            CoreError::NotFound { entity, id } => (
                StatusCode::NOT_FOUND,
                error_body("NOT_FOUND", format!("{entity} with id {id} not found")),
                false,
            ),
            CoreError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                error_body("VALIDATION_ERROR", msg.clone()),
                false,
            ),
            CoreError::Conflict(msg) => (
                StatusCode::CONFLICT,
                error_body("CONFLICT", msg.clone()),
                false,
            ),
            CoreError::SessionRequired(reason) => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "A valid onboarding session is required",
                    "code": "SESSION_REQUIRED",
                    "reason": reason.as_str(),
                }),
                true,
            ),
            CoreError::AccessRevoked(reason) => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Onboarding access has been revoked",
                    "code": "UNAUTHORIZED",
                    "reason": reason.as_str(),
                }),
                true,
            ),
            CoreError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                error_body("UNAUTHORIZED", msg.clone()),
                false,
            ),
            CoreError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                error_body("FORBIDDEN", msg.clone()),
                false,
            ),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal core error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
                    false,
                )
            }
        },

        AppError::Database(err) => {
            let (status, code, message) = classify_sqlx_error(err);
            (status, error_body(code, message), false)
        }

        AppError::Email(err) => {
            tracing::error!(error = %err, "Email delivery failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", "Failed to send email".to_string()),
                false,
            )
        }

        AppError::BadRequest(msg) => (
            StatusCode::BAD_REQUEST,
            error_body("BAD_REQUEST", msg.clone()),
            false,
        ),
        AppError::InternalError(msg) => {
            tracing::error!(error = %msg, "Internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("INTERNAL_ERROR", "An internal error occurred".to_string()),
                false,
            )
        }
    }
}

fn error_body(code: &str, message: String) -> Value {
    json!({ "error": message, "code": code })
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`)
///   map to 409 — this is how the racing-create loser surfaces.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "An active onboarding already exists for this employee".to_string(),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use newhire_core::error::{RevokedReason, SessionRequiredReason};

    use super::*;

    #[test]
    fn session_required_clears_cookie() {
        let err = AppError::Core(CoreError::SessionRequired(SessionRequiredReason::Expired));
        let (status, body, clear) = classify(&err);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "SESSION_REQUIRED");
        assert_eq!(body["reason"], "EXPIRED");
        assert!(clear);
    }

    #[test]
    fn access_revoked_reports_reason_and_clears_cookie() {
        let err = AppError::Core(CoreError::AccessRevoked(RevokedReason::Approved));
        let (status, body, clear) = classify(&err);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["reason"], "APPROVED");
        assert!(clear);
    }

    #[test]
    fn read_only_violation_keeps_cookie() {
        let err = AppError::Core(CoreError::Forbidden("read-only".into()));
        let (status, body, clear) = classify(&err);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
        assert!(!clear);
    }

    #[test]
    fn conflict_maps_to_409() {
        let err = AppError::Core(CoreError::Conflict("duplicate".into()));
        let (status, body, _) = classify(&err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[test]
    fn response_carries_clear_cookie_header() {
        let err = AppError::Core(CoreError::SessionRequired(SessionRequiredReason::NoMatch));
        let response = err.into_response();
        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("Set-Cookie must be present")
            .to_str()
            .unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
