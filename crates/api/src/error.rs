use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leasehold_core::error::CoreError;
use leasehold_providers::{GatewayError, GeocodeError};
use serde::Serialize;

/// Error type returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; the remaining variants cover
/// storage, request shape and the external providers. Rendered as
/// `{"error": <message>, "code": <CODE>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged, never shown to the client.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The payment gateway or geocoder failed. The message is shown.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A collaborator the endpoint needs has no credentials.
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// The gateway reports a transaction in a non-success state.
    #[error("Payment not successful: {0}")]
    PaymentNotSuccessful(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Config(msg) => AppError::InternalError(msg),
            other => AppError::Upstream(format!("Payment provider error: {other}")),
        }
    }
}

impl From<GeocodeError> for AppError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::Config(msg) => AppError::InternalError(msg),
            other => AppError::Upstream(format!("Geocoding error: {other}")),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort_unstable();
        AppError::Core(CoreError::Validation(format!(
            "Invalid or missing fields: {}",
            fields.join(", ")
        )))
    }
}

impl AppError {
    /// Status, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::Upstream(msg) => {
                tracing::warn!(error = %msg, "Provider call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", msg.clone())
            }
            AppError::NotConfigured(what) => {
                tracing::error!(missing = %what, "Endpoint called without required configuration");
                (StatusCode::INTERNAL_SERVER_ERROR, "NOT_CONFIGURED", what.to_string())
            }
            AppError::PaymentNotSuccessful(status) => (
                StatusCode::BAD_REQUEST,
                "PAYMENT_NOT_SUCCESSFUL",
                format!("Payment status is: {status}"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Client-facing messages for the marketplace's unique constraints.
const CONSTRAINT_MESSAGES: &[(&str, &str)] = &[
    (
        "uq_applications_active_tenant_property",
        "You already have an active application for this property",
    ),
    ("uq_applications_lease_id", "Lease is already linked to an application"),
    ("uq_payments_provider_reference", "Payment reference already recorded"),
    ("uq_tenants_clerk_id", "Tenant already exists"),
    ("uq_managers_clerk_id", "Manager already exists"),
];

/// Map storage failures onto the error contract.
///
/// Unique violations on `uq_*` constraints are conflicts, foreign-key and
/// check violations are bad input, a missing row is a 404. Anything else is
/// logged and sanitised.
fn database_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    match db_err.code().as_deref() {
        Some("23505") => {
            let constraint = db_err.constraint().unwrap_or_default();
            if let Some((_, message)) = CONSTRAINT_MESSAGES.iter().find(|(c, _)| *c == constraint) {
                return (StatusCode::CONFLICT, "CONFLICT", message.to_string());
            }
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
        }
        Some("23503") => {
            return (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Referenced record does not exist".to_string(),
            )
        }
        Some("23514") => {
            return (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!(
                    "Value violates check constraint: {}",
                    db_err.constraint().unwrap_or("unknown")
                ),
            )
        }
        _ => {}
    }

    tracing::error!(error = %db_err, "Database error");
    internal()
}

/// Name of the unique constraint a sqlx error violated, if any.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            db_err.constraint()
        }
        _ => None,
    }
}
