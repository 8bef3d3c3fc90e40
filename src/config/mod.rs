//! Configuration management
//!
//! Configuration is a single YAML document. API keys may reference
//! environment variables with `${VAR}` and are expanded at load time.

pub mod models;

pub use models::{CorsConfig, ProviderSettings, QuotaConfig, RouterConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::utils::error::{GatewayError, Result};

/// Default config path when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config/promptforge.yaml";

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub providers: Vec<ProviderSettings>,
    pub router: RouterConfig,
    pub quota: QuotaConfig,
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(?path, "loading configuration");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("failed to read {:?}: {}", path, e)))?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("failed to parse config: {}", e)))?;

        for provider in &mut config.providers {
            provider.api_key = expand_env(&provider.api_key);
        }

        config.validate()?;
        debug!("configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.server
            .validate()
            .map_err(|e| GatewayError::Config(format!("server config error: {}", e)))?;

        for provider in &self.providers {
            provider
                .validate()
                .map_err(|e| GatewayError::Config(format!("provider config error: {}", e)))?;
        }

        let enabled = self.providers.iter().filter(|p| p.enabled).count();
        if !self.providers.is_empty() && enabled == 0 {
            return Err(GatewayError::Config(
                "all configured providers are disabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expand a `${VAR}` reference against the process environment.
/// Unset variables expand to an empty string, which validation then
/// rejects for enabled remote providers.
fn expand_env(value: &str) -> String {
    if let Some(name) = value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
    {
        std::env::var(name).unwrap_or_default()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
server:
  host: "0.0.0.0"
  port: 9000

providers:
  - kind: "openai"
    api_key: "sk-test"
    default_model: "gpt-4o-mini"
  - kind: "mock"

router:
  strategy: "lowest_cost"
  fallback_enabled: true

quota:
  monthly_requests: 500
  monthly_tokens: 100000
"#;

    #[tokio::test]
    async fn test_from_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::from_file(temp.path()).await.unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.providers[0].kind, "openai");
        assert_eq!(config.quota.monthly_requests, 500);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_env_expansion() {
        std::env::set_var("PF_TEST_KEY", "sk-from-env");
        let yaml = r#"
providers:
  - kind: "openai"
    api_key: "${PF_TEST_KEY}"
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.providers[0].api_key, "sk-from-env");
    }

    #[test]
    fn test_rejects_unknown_provider_kind() {
        let yaml = r#"
providers:
  - kind: "watsonx"
    api_key: "k"
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_rejects_all_disabled() {
        let yaml = r#"
providers:
  - kind: "mock"
    enabled: false
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}
