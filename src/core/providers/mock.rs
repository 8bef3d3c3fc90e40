//! Mock provider for tests and local development
//!
//! Serves canned responses without network access. Latency and failure
//! injection are configurable; failure injection is deterministic (every
//! Nth request) so fallback tests do not flake.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::{LlmProvider, ModelInfo, ProviderError, HEALTH_PROBE_PROMPT};
use crate::core::types::{GenerationRequest, GenerationResponse, TokenUsage};

static MOCK_MODELS: &[ModelInfo] = &[ModelInfo {
    id: "mock-default",
    max_output_tokens: 4096,
    input_cost_per_1k: 0.0,
    output_cost_per_1k: 0.0,
}];

/// Mock adapter configuration
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Name under which the mock registers; lets tests run several mocks
    pub name: &'static str,
    /// Artificial latency added to every request
    pub latency: Duration,
    /// Fail every Nth request (0 disables injection, 1 fails everything)
    pub fail_every: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock",
            latency: Duration::from_millis(10),
            fail_every: 0,
        }
    }
}

impl MockConfig {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 1 fails every request, 2 every second request, and so on
    pub fn failing_every(mut self, n: u64) -> Self {
        self.fail_every = n;
        self
    }
}

/// Offline provider adapter serving canned responses
#[derive(Debug)]
pub struct MockProvider {
    config: MockConfig,
    request_counter: AtomicU64,
}

impl MockProvider {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            request_counter: AtomicU64::new(0),
        }
    }

    fn should_fail(&self) -> bool {
        if self.config.fail_every == 0 {
            return false;
        }
        let n = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        n % self.config.fail_every == 0
    }

    fn canned_reply(&self, request: &GenerationRequest) -> String {
        if request.prompt == HEALTH_PROBE_PROMPT {
            return "Hello!".to_string();
        }
        let tail: String = request
            .prompt
            .chars()
            .rev()
            .take(48)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("[{}] canned response for: {}", self.config.name, tail)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.config.name
    }

    fn default_model(&self) -> &str {
        "mock-default"
    }

    fn models(&self) -> &[ModelInfo] {
        MOCK_MODELS
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let start = Instant::now();
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if self.should_fail() {
            return Err(ProviderError::upstream(
                self.config.name,
                503,
                "injected failure",
            ));
        }

        let content = self.canned_reply(request);
        let usage = TokenUsage::new(
            self.estimate_tokens(&request.prompt),
            self.estimate_tokens(&content),
        );
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(GenerationResponse::new(
            content,
            request.model.as_deref().unwrap_or("mock-default"),
            self.config.name,
            usage,
            0.0,
            latency_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_response_echoes_prompt_tail() {
        let provider = MockProvider::new(MockConfig::default().with_latency(Duration::ZERO));
        let response = provider
            .generate(&GenerationRequest::new("write a poem"))
            .await
            .unwrap();
        assert!(response.content.contains("write a poem"));
        assert_eq!(response.provider, "mock");
        assert_eq!(response.cost, 0.0);
    }

    #[test]
    fn test_token_estimate_counts_chars_not_bytes() {
        let provider = MockProvider::new(MockConfig::default());
        assert_eq!(provider.estimate_tokens(""), 0);
        assert_eq!(provider.estimate_tokens("aaaa"), 1);
        assert_eq!(provider.estimate_tokens("aaaaa"), 2);
        // four chars, eight bytes
        assert_eq!(provider.estimate_tokens("éééé"), 1);
    }

    #[tokio::test]
    async fn test_health_probe_gets_greeting() {
        let provider = MockProvider::new(MockConfig::default().with_latency(Duration::ZERO));
        let health = provider.health_check().await;
        assert_eq!(health.state, crate::core::types::HealthState::Healthy);
    }

    #[tokio::test]
    async fn test_deterministic_failure_injection() {
        let provider = MockProvider::new(
            MockConfig::default()
                .with_latency(Duration::ZERO)
                .failing_every(2),
        );
        let req = GenerationRequest::new("x");
        assert!(provider.generate(&req).await.is_ok());
        assert!(provider.generate(&req).await.is_err());
        assert!(provider.generate(&req).await.is_ok());
        assert!(provider.generate(&req).await.is_err());
    }

    #[tokio::test]
    async fn test_always_failing_mock() {
        let provider = MockProvider::new(
            MockConfig::default()
                .with_latency(Duration::ZERO)
                .failing_every(1),
        );
        let err = provider
            .generate(&GenerationRequest::new("x"))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
