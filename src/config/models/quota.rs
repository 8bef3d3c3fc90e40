//! Usage quota configuration

use serde::{Deserialize, Serialize};

/// Monthly per-user limits enforced by the AI endpoints.
///
/// A limit of 0 means unlimited.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub monthly_requests: u64,
    pub monthly_tokens: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        // Free-tier defaults
        Self {
            monthly_requests: 100,
            monthly_tokens: 50_000,
        }
    }
}

impl QuotaConfig {
    pub fn unlimited() -> Self {
        Self {
            monthly_requests: 0,
            monthly_tokens: 0,
        }
    }
}
