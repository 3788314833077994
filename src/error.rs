use thiserror::Error;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A validation error (malformed or missing input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A not found error (resource does not exist).
    #[error("Not found: {0}")]
    NotFound(String),

    /// A forbidden error (caller owns a different tenant).
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// An unauthorized error (missing or unknown operator credential).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A rejected order status transition. Carries the allowed target set
    /// so the caller can self-correct.
    #[error("Invalid transition: {from} -> {requested}. Allowed: [{}]", .allowed.join(", "))]
    InvalidTransition {
        from: String,
        requested: String,
        allowed: Vec<String>,
    },

    /// A messaging gateway (WhatsApp Cloud API) failure.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response
///
/// This implementation maps each error variant to an appropriate HTTP status code
/// and returns a JSON response with an error message and error code.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = match &self {
            Error::Validation(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "VALIDATION_ERROR"
                })
            }
            Error::NotFound(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "NOT_FOUND"
                })
            }
            Error::Forbidden(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "FORBIDDEN"
                })
            }
            Error::Unauthorized(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "UNAUTHORIZED"
                })
            }
            Error::InvalidTransition { allowed, .. } => {
                serde_json::json!({
                    "error": self.to_string(),
                    "code": "INVALID_TRANSITION",
                    "allowed": allowed
                })
            }
            Error::Gateway(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "GATEWAY_ERROR"
                })
            }
            Error::Sqlx(_) => {
                serde_json::json!({
                    "error": "Database error",
                    "code": "INTERNAL_ERROR"
                })
            }
            Error::Config(_) => {
                serde_json::json!({
                    "error": "Configuration error",
                    "code": "CONFIG_ERROR"
                })
            }
            Error::Internal(msg) => {
                serde_json::json!({
                    "error": msg,
                    "code": "INTERNAL_ERROR"
                })
            }
        };

        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Gateway(_) => StatusCode::BAD_GATEWAY,
            Error::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(body)).into_response()
    }
}
