//! Anthropic provider adapter
//!
//! Wraps the `/v1/messages` endpoint. Anthropic authenticates with an
//! `x-api-key` header rather than a bearer token, takes the system prompt
//! as a top-level field, and requires `max_tokens` on every request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{LlmProvider, ModelInfo, ProviderError};
use crate::core::types::{GenerationRequest, GenerationResponse, TokenUsage};

const PROVIDER_NAME: &str = "anthropic";
const DEFAULT_API_BASE: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Price table; USD per 1K tokens
static ANTHROPIC_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "claude-3-5-sonnet-20241022",
        max_output_tokens: 8192,
        input_cost_per_1k: 0.003,
        output_cost_per_1k: 0.015,
    },
    ModelInfo {
        id: "claude-3-5-haiku-20241022",
        max_output_tokens: 8192,
        input_cost_per_1k: 0.0008,
        output_cost_per_1k: 0.004,
    },
    ModelInfo {
        id: "claude-3-haiku-20240307",
        max_output_tokens: 4096,
        input_cost_per_1k: 0.00025,
        output_cost_per_1k: 0.00125,
    },
];

/// Anthropic adapter configuration
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub api_base: String,
    pub default_model: String,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: "claude-3-5-haiku-20241022".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::configuration(
                PROVIDER_NAME,
                "api_key must not be empty",
            ));
        }
        Ok(())
    }
}

/// Anthropic provider adapter
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::configuration(PROVIDER_NAME, e.to_string()))?;
        Ok(Self { config, client })
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<MessageParam<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn models(&self) -> &[ModelInfo] {
        ANTHROPIC_MODELS
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        // reject explicit overrides outside the price table before dialing
        // out; configured defaults are the operator's call
        if let Some(model) = request.model.as_deref() {
            if !self.supports_model(model) {
                return Err(ProviderError::model_not_found(PROVIDER_NAME, model));
            }
        }

        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);
        debug!(provider = PROVIDER_NAME, model, "dispatching messages request");

        let body = MessagesRequest {
            model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages: vec![MessageParam {
                role: "user",
                content: &request.prompt,
            }],
            system: request.system.as_deref(),
            temperature: request.temperature,
            top_p: request.top_p,
        };

        let url = format!("{}/v1/messages", self.config.api_base);
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::from_reqwest(PROVIDER_NAME, e))?;

        if !status.is_success() {
            return Err(ProviderError::from_status(
                PROVIDER_NAME,
                status.as_u16(),
                &text,
            ));
        }

        let latency_ms = start.elapsed().as_millis() as u64;
        let parsed: MessagesResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::response_parsing(PROVIDER_NAME, e.to_string()))?;

        let content = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| {
                ProviderError::response_parsing(PROVIDER_NAME, "response contained no text block")
            })?;

        let usage = TokenUsage::new(parsed.usage.input_tokens, parsed.usage.output_tokens);
        let cost = self.calculate_cost(model, usage.prompt_tokens, usage.completion_tokens);

        Ok(GenerationResponse::new(
            content,
            model,
            PROVIDER_NAME,
            usage,
            cost,
            latency_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(AnthropicProvider::new(AnthropicConfig::new("")).is_err());
        assert!(AnthropicProvider::new(AnthropicConfig::new("sk-ant-test")).is_ok());
    }

    #[test]
    fn test_system_prompt_is_top_level() {
        let body = MessagesRequest {
            model: "claude-3-5-haiku-20241022",
            max_tokens: 256,
            messages: vec![MessageParam {
                role: "user",
                content: "hi",
            }],
            system: Some("be brief"),
            temperature: None,
            top_p: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "id": "msg_01",
            "content": [{"type": "text", "text": "Hello!"}],
            "usage": {"input_tokens": 8, "output_tokens": 2}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.content[0].text.as_deref(), Some("Hello!"));
        assert_eq!(parsed.usage.input_tokens, 8);
    }

    #[tokio::test]
    async fn test_unknown_model_override_rejected_before_dispatch() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("sk-ant-test")).unwrap();
        let err = provider
            .generate(&GenerationRequest::new("hi").with_model("claude-99"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound { .. }));
    }

    #[test]
    fn test_cost_uses_price_table() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("sk-ant-test")).unwrap();
        // claude-3-5-sonnet: 1000 in @ 0.003, 2000 out @ 0.015
        let cost = provider.calculate_cost("claude-3-5-sonnet-20241022", 1000, 2000);
        assert!((cost - 0.033).abs() < 1e-9);
    }
}
