use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error envelope returned to HTTP clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g. "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Domain and infrastructure error taxonomy.
///
/// Domain violations are raised at the point of failure and propagate
/// unhandled to the HTTP layer; each variant carries enough context (ids,
/// username) to render a user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("User with username: {0} was not found")]
    UserNotFound(String),

    #[error("Movie with id: {0} was not found")]
    MovieNotFound(i64),

    #[error("Shopping cart with id: {0} was not found")]
    ShoppingCartNotFound(i64),

    #[error("Movie with id: {movie_id} already exists in the shopping cart for the user with username {username}")]
    MovieAlreadyInCart { movie_id: i64, username: String },

    #[error("Unsupported principal kind: {0}")]
    UnsupportedPrincipalKind(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UserNotFound(_)
            | Self::MovieNotFound(_)
            | Self::ShoppingCartNotFound(_)
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MovieAlreadyInCart { .. } | Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnsupportedPrincipalKind(_) | Self::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message suitable for HTTP responses.
    /// Internal errors return generic text to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
