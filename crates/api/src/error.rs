use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use tourbook_booking::BookingError;
use tourbook_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`sqlx::Error`] for storage failures.
/// Implements [`IntoResponse`] to produce consistent JSON error responses:
///
/// ```json
/// { "error": "...", "code": "INSUFFICIENT_STOCK", "details": { ... } }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tourbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Core(core) => Self::Core(core),
            BookingError::Database(db) => Self::Database(db),
        }
    }
}

/// Everything an error contributes to a response body.
#[derive(Debug)]
pub struct ErrorParts {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

impl ErrorParts {
    fn new(status: StatusCode, code: &'static str, message: String) -> Self {
        Self {
            status,
            code,
            message,
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl AppError {
    /// Classify this error into status, code, sanitized message, and details.
    pub fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let parts = self.parts();
        let mut body = json!({
            "error": parts.message,
            "code": parts.code,
        });
        if let Some(details) = parts.details {
            body["details"] = details;
        }
        (parts.status, axum::Json(body)).into_response()
    }
}

fn core_parts(core: &CoreError) -> ErrorParts {
    match core {
        CoreError::NotFound { entity, id } => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => {
            ErrorParts::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => {
            ErrorParts::new(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                .with_details(json!({ "retryable": true }))
        }
        CoreError::ScheduleNotFound {
            product_id,
            travel_date,
        } => ErrorParts::new(StatusCode::NOT_FOUND, "SCHEDULE_NOT_FOUND", core.to_string())
            .with_details(json!({
                "product_id": product_id,
                "travel_date": travel_date,
            })),
        CoreError::InsufficientStock {
            requested,
            available,
        } => ErrorParts::new(StatusCode::CONFLICT, "INSUFFICIENT_STOCK", core.to_string())
            .with_details(json!({
                "requested": requested,
                "available_stock": available,
            })),
        CoreError::InvalidTransition { from, to } => ErrorParts::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_TRANSITION",
            core.to_string(),
        )
        .with_details(json!({ "from": from, "to": to })),
        CoreError::Unauthorized(msg) => {
            ErrorParts::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => {
            ErrorParts::new(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

fn internal() -> ErrorParts {
    ErrorParts::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    match err {
        sqlx::Error::RowNotFound => ErrorParts::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return ErrorParts::new(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    )
                    .with_details(json!({ "retryable": true }));
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
