//! Service-level error handling
//!
//! `GatewayError` is the error type crossing module boundaries. It
//! implements `actix_web::ResponseError` so handlers can map failures to
//! JSON error bodies with the right status code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::core::providers::ProviderError;

/// Result alias used throughout the service
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Monthly quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("No providers available: {0}")]
    NoProvidersAvailable(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("All providers failed (tried {attempted:?}): {last_error}")]
    AllProvidersFailed {
        attempted: Vec<String>,
        last_error: ProviderError,
    },

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON error body returned by the API
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: ErrorDetail<'a>,
}

#[derive(Debug, Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
}

impl GatewayError {
    fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            Self::NoProvidersAvailable(_) => "NO_PROVIDERS_AVAILABLE",
            Self::ProviderNotFound(_) => "PROVIDER_NOT_FOUND",
            Self::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Yaml(_) => "CONFIG_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::NoProvidersAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ProviderNotFound(_) => StatusCode::NOT_FOUND,
            Self::AllProvidersFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::Provider(err) => {
                StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Config(_) | Self::Yaml(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal details stay in logs, not in client-facing bodies
        let message = match self {
            Self::Config(_) | Self::Io(_) | Self::Yaml(_) | Self::Internal(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: ErrorDetail {
                code: self.code(),
                message,
            },
        })
    }
}
