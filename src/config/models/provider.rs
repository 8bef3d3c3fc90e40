//! Provider configuration entries

use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    30
}

fn default_enabled() -> bool {
    true
}

/// One configured provider adapter.
///
/// `kind` selects the adapter implementation (`openai`, `anthropic`,
/// `mock`); model price tables are compiled into each adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Adapter kind: "openai", "anthropic" or "mock"
    pub kind: String,
    /// API key; supports `${ENV_VAR}` expansion at load time
    #[serde(default)]
    pub api_key: String,
    /// Override the adapter's default API base URL
    #[serde(default)]
    pub api_base: Option<String>,
    /// Override the adapter's default model
    #[serde(default)]
    pub default_model: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Disabled providers are skipped at startup
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ProviderSettings {
    pub fn validate(&self) -> Result<(), String> {
        match self.kind.as_str() {
            "openai" | "anthropic" => {
                if self.enabled && self.api_key.is_empty() {
                    return Err(format!("provider '{}' requires an api_key", self.kind));
                }
            }
            "mock" => {}
            other => return Err(format!("unknown provider kind: {}", other)),
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be non-zero".to_string());
        }
        Ok(())
    }
}
