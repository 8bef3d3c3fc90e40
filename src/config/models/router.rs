//! Routing configuration

use serde::{Deserialize, Serialize};

use crate::core::router::RoutingStrategy;

fn default_fallback() -> bool {
    true
}

/// Router behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Provider selection strategy
    pub strategy: RoutingStrategy,
    /// When true, AI endpoints walk the registry on failure instead of
    /// surfacing the first provider error
    #[serde(default = "default_fallback")]
    pub fallback_enabled: bool,
    /// Interval for the background health sweep in seconds; 0 disables it
    pub health_check_interval_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            strategy: RoutingStrategy::default(),
            fallback_enabled: true,
            health_check_interval_secs: 0,
        }
    }
}
