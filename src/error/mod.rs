//! Centralized API error handling for SocialBlast
//!
//! This module provides a unified error type for API responses with proper
//! HTTP status code mapping and JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;
use crate::escrow::EscrowError;
use crate::esim::EsimError;
use crate::orders::OrderError;
use crate::reseller::ResellerError;
use crate::smm::SmmError;
use crate::support::SupportError;
use crate::wallet::WalletError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Insufficient balance")]
    InsufficientFunds,

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in the response
#[derive(Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests => "TOO_MANY_REQUESTS",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InsufficientFunds => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        // Log server errors
        match &self {
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => {
                tracing::error!(error = %message, code = %error_code, "Server error occurred");
            }
            _ => {
                tracing::debug!(error = %message, code = %error_code, "Client error occurred");
            }
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: error_code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

// Convenience conversions from common error types

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::DatabaseError(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::ExternalServiceError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("Invalid JSON: {}", err))
    }
}

// Domain error mappings. The UI collapses most of these to a generic
// failure message; the typed codes stay visible in the response body.

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::InsufficientFunds { .. } => ApiError::InsufficientFunds,
            // An escrow underflow means our own bookkeeping is wrong.
            WalletError::EscrowUnderflow { .. } => ApiError::InternalError(err.to_string()),
            WalletError::AccountNotFound(_) => ApiError::NotFound(err.to_string()),
            WalletError::Database(e) => e.into(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ItemNotAvailable(_) => ApiError::Conflict(err.to_string()),
            CatalogError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
            CatalogError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CatalogError::CodeNotVisible => ApiError::Forbidden(err.to_string()),
            CatalogError::Database(e) => e.into(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::AlreadyFinalized(_) => ApiError::Conflict(err.to_string()),
            OrderError::NotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::Database(e) => e.into(),
        }
    }
}

impl From<EscrowError> for ApiError {
    fn from(err: EscrowError) -> Self {
        match err {
            EscrowError::Wallet(e) => e.into(),
            EscrowError::Catalog(e) => e.into(),
            EscrowError::Order(e) => e.into(),
            EscrowError::Forbidden(msg) => ApiError::Forbidden(msg),
            EscrowError::InvalidOrder(msg) => ApiError::BadRequest(msg),
            EscrowError::Database(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailTaken => ApiError::Conflict(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::HashingFailed(msg) => ApiError::InternalError(msg),
            AuthError::Jwt(e) => ApiError::Unauthorized(e.to_string()),
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<EsimError> for ApiError {
    fn from(err: EsimError) -> Self {
        match err {
            EsimError::PlanNotAvailable(_) => ApiError::Conflict(err.to_string()),
            EsimError::NotFound(_) => ApiError::NotFound(err.to_string()),
            EsimError::Wallet(e) => e.into(),
            EsimError::Order(e) => e.into(),
            EsimError::Database(e) => e.into(),
        }
    }
}

impl From<SmmError> for ApiError {
    fn from(err: SmmError) -> Self {
        match err {
            SmmError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SmmError::QuantityOutOfRange { .. } => ApiError::BadRequest(err.to_string()),
            SmmError::Wallet(e) => e.into(),
            SmmError::Order(e) => e.into(),
            SmmError::Database(e) => e.into(),
        }
    }
}

impl From<ResellerError> for ApiError {
    fn from(err: ResellerError) -> Self {
        // The upstream detail stays in logs; callers get a generic failure
        ApiError::ExternalServiceError(err.to_string())
    }
}

impl From<crate::reseller::PhoneError> for ApiError {
    fn from(err: crate::reseller::PhoneError) -> Self {
        use crate::reseller::PhoneError;
        match err {
            PhoneError::Reseller(e) => e.into(),
            PhoneError::Order(e) => e.into(),
            PhoneError::Database(e) => e.into(),
        }
    }
}

impl From<SupportError> for ApiError {
    fn from(err: SupportError) -> Self {
        match err {
            SupportError::NotFound(_) => ApiError::NotFound(err.to_string()),
            SupportError::Forbidden => ApiError::Forbidden(err.to_string()),
            SupportError::Database(e) => e.into(),
        }
    }
}

/// Result type alias using ApiError
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::BadRequest("test".to_string()).error_code(),
            "BAD_REQUEST"
        );
        assert_eq!(ApiError::InsufficientFunds.error_code(), "INSUFFICIENT_FUNDS");
        assert_eq!(ApiError::TooManyRequests.error_code(), "TOO_MANY_REQUESTS");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InsufficientFunds.status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::InternalError("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: ApiError = WalletError::InsufficientFunds {
            required: 200,
            available: 100,
        }
        .into();
        assert_eq!(err.error_code(), "INSUFFICIENT_FUNDS");

        let err: ApiError = CatalogError::ItemNotAvailable(uuid::Uuid::nil()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = OrderError::AlreadyFinalized(uuid::Uuid::nil()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        // Underflow is an internal invariant violation, not a caller error
        let err: ApiError = WalletError::EscrowUnderflow {
            required: 100,
            held: 50,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
