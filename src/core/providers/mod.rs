//! Provider adapters
//!
//! Every upstream LLM vendor is wrapped in one adapter implementing
//! [`LlmProvider`]. Adapters normalize requests and responses, classify
//! upstream failures into [`ProviderError`], and price completed requests
//! from their static model tables.

pub mod anthropic;
pub mod error;
pub mod mock;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::Serialize;
use std::time::Instant;
use tracing::warn;

use crate::core::types::{GenerationRequest, GenerationResponse, ProviderHealth};

/// Prompt sent by health probes; adapters check the reply echoes a greeting
pub const HEALTH_PROBE_PROMPT: &str = "Say hello";

/// Static model metadata: capability limits and per-1K-token pricing
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: &'static str,
    pub max_output_tokens: u32,
    /// USD per 1000 prompt tokens
    pub input_cost_per_1k: f64,
    /// USD per 1000 completion tokens
    pub output_cost_per_1k: f64,
}

impl ModelInfo {
    /// Price a request against this model's table
    pub fn cost(&self, input_tokens: u32, output_tokens: u32) -> f64 {
        (input_tokens as f64 / 1000.0) * self.input_cost_per_1k
            + (output_tokens as f64 / 1000.0) * self.output_cost_per_1k
    }

    /// Combined per-1K price used by cost-based routing
    pub fn combined_cost_per_1k(&self) -> f64 {
        self.input_cost_per_1k + self.output_cost_per_1k
    }
}

/// Unified interface implemented by every provider adapter.
///
/// Object-safe so the manager can hold a heterogeneous registry of
/// `Arc<dyn LlmProvider>`.
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Unique provider name used for routing and logging
    fn name(&self) -> &'static str;

    /// Model used when a request carries no override
    fn default_model(&self) -> &str;

    /// Static price/capability table for this provider's models
    fn models(&self) -> &[ModelInfo];

    /// Execute one generation request
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError>;

    fn supports_model(&self, model: &str) -> bool {
        self.models().iter().any(|m| m.id == model)
    }

    /// Price a completed request. Unknown models are priced at zero.
    fn calculate_cost(&self, model: &str, input_tokens: u32, output_tokens: u32) -> f64 {
        match self.models().iter().find(|m| m.id == model) {
            Some(info) => info.cost(input_tokens, output_tokens),
            None => {
                warn!(provider = self.name(), model, "no price table entry, pricing at zero");
                0.0
            }
        }
    }

    /// Combined per-1K price of the default model, used by cost routing
    fn default_model_cost_per_1k(&self) -> f64 {
        self.models()
            .iter()
            .find(|m| m.id == self.default_model())
            .map(|m| m.combined_cost_per_1k())
            .unwrap_or(0.0)
    }

    /// Rough token estimate: one token per four characters
    fn estimate_tokens(&self, text: &str) -> u32 {
        (text.chars().count() as f64 / 4.0).ceil() as u32
    }

    /// Probe the provider with a canned prompt and classify the outcome
    async fn health_check(&self) -> ProviderHealth {
        let probe = GenerationRequest::new(HEALTH_PROBE_PROMPT).with_max_tokens(16);
        let start = Instant::now();
        match self.generate(&probe).await {
            Ok(response) => {
                let latency = start.elapsed().as_millis() as u64;
                if response.content.to_lowercase().contains("hello") {
                    ProviderHealth::healthy(latency)
                } else {
                    ProviderHealth::degraded(format!(
                        "unexpected probe reply: {}",
                        truncate_reply(&response.content)
                    ))
                }
            }
            Err(err @ ProviderError::Network { .. })
            | Err(err @ ProviderError::Timeout { .. })
            | Err(err @ ProviderError::RateLimit { .. }) => {
                ProviderHealth::degraded(err.to_string())
            }
            Err(err) => ProviderHealth::unhealthy(err.to_string()),
        }
    }
}

fn truncate_reply(content: &str) -> String {
    content.chars().take(64).collect()
}
