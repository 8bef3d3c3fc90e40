//! OpenAI provider adapter
//!
//! Wraps the `/chat/completions` endpoint with bearer authentication.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{LlmProvider, ModelInfo, ProviderError};
use crate::core::types::{GenerationRequest, GenerationResponse, TokenUsage};

const PROVIDER_NAME: &str = "openai";
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Price table; USD per 1K tokens
static OPENAI_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gpt-4o",
        max_output_tokens: 16384,
        input_cost_per_1k: 0.0025,
        output_cost_per_1k: 0.01,
    },
    ModelInfo {
        id: "gpt-4o-mini",
        max_output_tokens: 16384,
        input_cost_per_1k: 0.00015,
        output_cost_per_1k: 0.0006,
    },
    ModelInfo {
        id: "gpt-3.5-turbo",
        max_output_tokens: 4096,
        input_cost_per_1k: 0.0005,
        output_cost_per_1k: 0.0015,
    },
];

/// OpenAI adapter configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_base: String,
    pub default_model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: "gpt-4o-mini".to_string(),
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

/// OpenAI provider adapter
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::configuration(PROVIDER_NAME, e.to_string()))?;
        Ok(Self { config, client })
    }

    fn resolve_model<'a>(&'a self, request: &'a GenerationRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.default_model)
    }
}

// ---- wire types ----

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn models(&self) -> &[ModelInfo] {
        OPENAI_MODELS
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

        let model = self.resolve_model(request);
        debug!(provider = PROVIDER_NAME, model, "dispatching chat completion");

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatCompletionRequest {
            model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            user: request.user.as_deref(),
        };

        let url = format!("{}/chat/completions", self.config.api_base);
        let start = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
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
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| ProviderError::response_parsing(PROVIDER_NAME, e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::response_parsing(PROVIDER_NAME, "response contained no choices")
            })?;

        // Fall back to the heuristic when usage is withheld
        let usage = match parsed.usage {
            Some(u) => TokenUsage::new(u.prompt_tokens, u.completion_tokens),
            None => TokenUsage::new(
                self.estimate_tokens(&request.prompt),
                self.estimate_tokens(&content),
            ),
        };
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
        assert!(OpenAiProvider::new(OpenAiConfig::new("")).is_err());
        assert!(OpenAiProvider::new(OpenAiConfig::new("sk-test")).is_ok());
    }

    #[test]
    fn test_model_table() {
        let provider = OpenAiProvider::new(OpenAiConfig::new("sk-test")).unwrap();
        assert!(provider.supports_model("gpt-4o"));
        assert!(provider.supports_model("gpt-4o-mini"));
        assert!(!provider.supports_model("claude-3-5-sonnet"));
        assert_eq!(provider.default_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_serialization_skips_unset_params() {
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            max_tokens: None,
            // exactly representable in f32 and f64, so equality is safe
            temperature: Some(0.5),
            top_p: None,
            user: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.5);
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("top_p").is_none());
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "id": "chatcmpl-abc",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello there"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("Hello there"));
        assert_eq!(parsed.usage.as_ref().unwrap().prompt_tokens, 9);
    }

    #[tokio::test]
    async fn test_unknown_model_override_rejected_before_dispatch() {
        let provider = OpenAiProvider::new(OpenAiConfig::new("sk-test")).unwrap();
        let err = provider
            .generate(&GenerationRequest::new("hi").with_model("gpt-99"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ModelNotFound { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_cost_uses_price_table() {
        let provider = OpenAiProvider::new(OpenAiConfig::new("sk-test")).unwrap();
        // gpt-4o: 1000 in @ 0.0025, 1000 out @ 0.01
        let cost = provider.calculate_cost("gpt-4o", 1000, 1000);
        assert!((cost - 0.0125).abs() < 1e-9);
        // unknown model priced at zero
        assert_eq!(provider.calculate_cost("gpt-99", 1000, 1000), 0.0);
    }
}
