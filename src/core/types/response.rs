//! Generation response and token accounting types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Token counts reported (or estimated) for one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Normalized response returned by every provider adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Gateway-assigned response id
    pub id: String,
    /// Generated text
    pub content: String,
    /// Model that served the request
    pub model: String,
    /// Name of the provider adapter that served the request
    pub provider: String,
    /// Token accounting
    pub usage: TokenUsage,
    /// Estimated cost in USD, from the provider's price table
    pub cost: f64,
    /// End-to-end request latency in milliseconds
    pub latency_ms: u64,
    /// Completion timestamp
    pub created_at: DateTime<Utc>,
}

impl GenerationResponse {
    pub fn new(
        content: impl Into<String>,
        model: impl Into<String>,
        provider: impl Into<String>,
        usage: TokenUsage,
        cost: f64,
        latency_ms: u64,
    ) -> Self {
        Self {
            id: format!("gen-{}", uuid::Uuid::new_v4()),
            content: content.into(),
            model: model.into(),
            provider: provider.into(),
            usage,
            cost,
            latency_ms,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage::new(120, 80);
        assert_eq!(usage.total_tokens, 200);
    }

    #[test]
    fn test_response_id_prefix() {
        let resp = GenerationResponse::new("hi", "gpt-4o", "openai", TokenUsage::new(1, 1), 0.0, 5);
        assert!(resp.id.starts_with("gen-"));
        assert_eq!(resp.provider, "openai");
    }
}
