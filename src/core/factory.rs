//! Provider wiring and prompt operations
//!
//! Builds a [`ProviderManager`] from static configuration and exposes the
//! two prompt-builder operations the API serves: improving a drafted
//! prompt and generating a prompt from a goal description.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::{Config, ProviderSettings};
use crate::core::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::core::providers::mock::{MockConfig, MockProvider};
use crate::core::providers::openai::{OpenAiConfig, OpenAiProvider};
use crate::core::providers::LlmProvider;
use crate::core::router::ProviderManager;
use crate::core::types::{GenerationRequest, GenerationResponse};
use crate::utils::error::{GatewayError, Result};

/// System instruction for the improve operation: the model rewrites the
/// user's draft and returns only the improved prompt.
const IMPROVE_SYSTEM_PROMPT: &str = "You are an expert prompt engineer. Rewrite the user's draft \
prompt to be clearer, more specific and better structured, preserving its intent. Reply with the \
improved prompt only, no commentary.";

/// System instruction for the generate operation: the model writes a prompt
/// that achieves the described goal.
const GENERATE_SYSTEM_PROMPT: &str = "You are an expert prompt engineer. Write an effective, \
well-structured prompt that accomplishes the goal the user describes. Reply with the prompt \
only, no commentary.";

/// Generation parameters accepted by the prompt operations
#[derive(Debug, Clone, Default)]
pub struct PromptOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub user: Option<String>,
}

/// Build a manager with every enabled provider from the configuration,
/// registered in configuration order
pub fn build_manager(config: &Config) -> Result<ProviderManager> {
    let mut manager = ProviderManager::new(config.router.strategy);

    for settings in config.providers.iter().filter(|p| p.enabled) {
        let provider = build_provider(settings)?;
        manager.register(provider);
    }

    info!(
        providers = ?manager.provider_names(),
        strategy = %manager.strategy(),
        "provider manager ready"
    );
    Ok(manager)
}

fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>> {
    let timeout = Duration::from_secs(settings.timeout_secs);
    match settings.kind.as_str() {
        "openai" => {
            let mut config = OpenAiConfig::new(settings.api_key.clone());
            config.timeout = timeout;
            if let Some(base) = &settings.api_base {
                config.api_base = base.clone();
            }
            if let Some(model) = &settings.default_model {
                config.default_model = model.clone();
            }
            Ok(Arc::new(OpenAiProvider::new(config)?))
        }
        "anthropic" => {
            let mut config = AnthropicConfig::new(settings.api_key.clone());
            config.timeout = timeout;
            if let Some(base) = &settings.api_base {
                config.api_base = base.clone();
            }
            if let Some(model) = &settings.default_model {
                config.default_model = model.clone();
            }
            Ok(Arc::new(AnthropicProvider::new(config)?))
        }
        "mock" => Ok(Arc::new(MockProvider::new(MockConfig::default()))),
        other => Err(GatewayError::Config(format!(
            "unknown provider kind: {}",
            other
        ))),
    }
}

/// Improve a drafted prompt. Routes through fallback when enabled.
pub async fn improve_prompt(
    manager: &ProviderManager,
    draft: &str,
    options: PromptOptions,
    fallback: bool,
) -> Result<GenerationResponse> {
    let request = build_request(IMPROVE_SYSTEM_PROMPT, draft, options);
    dispatch(manager, &request, fallback).await
}

/// Generate a prompt from a goal description. Routes through fallback when
/// enabled.
pub async fn generate_prompt(
    manager: &ProviderManager,
    description: &str,
    options: PromptOptions,
    fallback: bool,
) -> Result<GenerationResponse> {
    let request = build_request(GENERATE_SYSTEM_PROMPT, description, options);
    dispatch(manager, &request, fallback).await
}

fn build_request(system: &str, text: &str, options: PromptOptions) -> GenerationRequest {
    GenerationRequest {
        prompt: text.to_string(),
        system: Some(system.to_string()),
        model: options.model,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        top_p: None,
        user: options.user,
    }
}

async fn dispatch(
    manager: &ProviderManager,
    request: &GenerationRequest,
    fallback: bool,
) -> Result<GenerationResponse> {
    if fallback {
        manager.generate_with_fallback(request).await
    } else {
        manager.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::RoutingStrategy;

    fn mock_only_config() -> Config {
        Config::from_yaml(
            r#"
providers:
  - kind: "mock"
router:
  strategy: "least_used"
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_build_manager_from_config() {
        let manager = build_manager(&mock_only_config()).unwrap();
        assert_eq!(manager.provider_names(), vec!["mock"]);
        assert_eq!(manager.strategy(), RoutingStrategy::LeastUsed);
    }

    #[test]
    fn test_disabled_providers_skipped() {
        let config = Config::from_yaml(
            r#"
providers:
  - kind: "openai"
    api_key: "sk-test"
    enabled: false
  - kind: "mock"
"#,
        )
        .unwrap();
        let manager = build_manager(&config).unwrap();
        assert_eq!(manager.provider_names(), vec!["mock"]);
    }

    #[tokio::test]
    async fn test_improve_prompt_roundtrip() {
        let manager = build_manager(&mock_only_config()).unwrap();
        let response = improve_prompt(&manager, "make a logo", PromptOptions::default(), true)
            .await
            .unwrap();
        assert_eq!(response.provider, "mock");
        assert!(response.content.contains("make a logo"));
    }

    #[tokio::test]
    async fn test_generate_prompt_roundtrip() {
        let manager = build_manager(&mock_only_config()).unwrap();
        let response = generate_prompt(
            &manager,
            "summarize meeting notes",
            PromptOptions {
                max_tokens: Some(128),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();
        assert!(response.content.contains("summarize meeting notes"));
    }
}
