//! Provider health types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse health classification produced by a health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    /// Probe succeeded and the reply looked sane
    Healthy,
    /// Transient trouble (network error, timeout); still eligible for traffic
    Degraded,
    /// Authentication or persistent failure; excluded from routing
    Unhealthy,
}

impl HealthState {
    /// Whether a provider in this state may receive traffic
    pub fn is_available(&self) -> bool {
        !matches!(self, HealthState::Unhealthy)
    }
}

/// Result of the most recent health probe for one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub state: HealthState,
    pub checked_at: DateTime<Utc>,
    /// Probe round-trip in milliseconds, when the probe completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    /// Error message when the probe failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderHealth {
    pub fn healthy(latency_ms: u64) -> Self {
        Self {
            state: HealthState::Healthy,
            checked_at: Utc::now(),
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            state: HealthState::Degraded,
            checked_at: Utc::now(),
            latency_ms: None,
            error: Some(error.into()),
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            state: HealthState::Unhealthy,
            checked_at: Utc::now(),
            latency_ms: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability() {
        assert!(HealthState::Healthy.is_available());
        assert!(HealthState::Degraded.is_available());
        assert!(!HealthState::Unhealthy.is_available());
    }

    #[test]
    fn test_constructors() {
        let h = ProviderHealth::healthy(42);
        assert_eq!(h.state, HealthState::Healthy);
        assert_eq!(h.latency_ms, Some(42));

        let u = ProviderHealth::unhealthy("invalid key");
        assert_eq!(u.state, HealthState::Unhealthy);
        assert_eq!(u.error.as_deref(), Some("invalid key"));
    }
}
