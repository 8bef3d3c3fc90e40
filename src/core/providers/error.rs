//! Unified provider error handling
//!
//! Single error type shared by all provider adapters. Each variant carries
//! the provider name so routing and logs can attribute failures, and the
//! manager uses `is_retryable` to drive fallback decisions.

use thiserror::Error;

/// Unified error type for all provider adapters
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Authentication failed for {provider}: {message}")]
    Authentication {
        provider: &'static str,
        message: String,
    },

    #[error("Rate limit exceeded for {provider}: {message}")]
    RateLimit {
        provider: &'static str,
        message: String,
        /// Seconds to wait before retrying, when the upstream reported one
        retry_after: Option<u64>,
    },

    #[error("Invalid request for {provider}: {message}")]
    InvalidRequest {
        provider: &'static str,
        message: String,
    },

    #[error("Model '{model}' not found for {provider}")]
    ModelNotFound {
        provider: &'static str,
        model: String,
    },

    #[error("Upstream error for {provider} (status {status}): {message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Network error for {provider}: {message}")]
    Network {
        provider: &'static str,
        message: String,
    },

    #[error("Timeout for {provider}: {message}")]
    Timeout {
        provider: &'static str,
        message: String,
    },

    #[error("Failed to parse {provider} response: {message}")]
    ResponseParsing {
        provider: &'static str,
        message: String,
    },

    #[error("Configuration error for {provider}: {message}")]
    Configuration {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn authentication(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Authentication {
            provider,
            message: message.into(),
        }
    }

    pub fn rate_limit(provider: &'static str, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            provider,
            message: match retry_after {
                Some(seconds) => format!("retry after {} seconds", seconds),
                None => "rate limit exceeded".to_string(),
            },
            retry_after,
        }
    }

    pub fn invalid_request(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            provider,
            message: message.into(),
        }
    }

    pub fn model_not_found(provider: &'static str, model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            provider,
            model: model.into(),
        }
    }

    pub fn upstream(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn network(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn timeout(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider,
            message: message.into(),
        }
    }

    pub fn response_parsing(provider: &'static str, message: impl Into<String>) -> Self {
        Self::ResponseParsing {
            provider,
            message: message.into(),
        }
    }

    pub fn configuration(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            provider,
            message: message.into(),
        }
    }

    /// Classify an HTTP error status from an upstream API
    pub fn from_status(provider: &'static str, status: u16, body: &str) -> Self {
        let message = extract_api_message(body).unwrap_or_else(|| truncate(body, 200));
        match status {
            401 | 403 => Self::authentication(provider, message),
            404 => Self::model_not_found(provider, message),
            429 => Self::RateLimit {
                provider,
                message,
                retry_after: None,
            },
            400 | 422 => Self::invalid_request(provider, message),
            500..=599 => Self::upstream(provider, status, message),
            _ => Self::upstream(provider, status, message),
        }
    }

    /// Whether a different provider (or a later retry) could plausibly
    /// succeed where this request failed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. }
            | Self::Network { .. }
            | Self::Timeout { .. }
            | Self::Upstream { .. } => true,
            Self::Authentication { .. }
            | Self::InvalidRequest { .. }
            | Self::ModelNotFound { .. }
            | Self::ResponseParsing { .. }
            | Self::Configuration { .. } => false,
        }
    }

    /// Suggested retry delay in seconds, when known
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// HTTP status the gateway should surface for this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication { .. } => 401,
            Self::RateLimit { .. } => 429,
            Self::InvalidRequest { .. } => 400,
            Self::ModelNotFound { .. } => 404,
            Self::Upstream { .. } => 502,
            Self::Network { .. } => 502,
            Self::Timeout { .. } => 504,
            Self::ResponseParsing { .. } => 502,
            Self::Configuration { .. } => 500,
        }
    }

    /// Name of the provider that produced this error
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Authentication { provider, .. }
            | Self::RateLimit { provider, .. }
            | Self::InvalidRequest { provider, .. }
            | Self::ModelNotFound { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::Network { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ResponseParsing { provider, .. }
            | Self::Configuration { provider, .. } => provider,
        }
    }

    /// Convert a reqwest transport error, distinguishing timeouts
    pub fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(provider, err.to_string())
        } else if err.is_connect() {
            Self::network(provider, format!("connection failed: {}", err))
        } else if err.is_decode() {
            Self::response_parsing(provider, err.to_string())
        } else {
            Self::network(provider, err.to_string())
        }
    }
}

/// Pull `error.message` out of a JSON error body, the shape both OpenAI and
/// Anthropic use
fn extract_api_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}
