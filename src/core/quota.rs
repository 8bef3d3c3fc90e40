//! Per-user monthly usage quotas
//!
//! Counters are keyed by user and `YYYY-MM` period, so a new month starts
//! fresh without an explicit reset. State is in-memory and rebuilt on
//! restart.

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::config::QuotaConfig;
use crate::core::types::TokenUsage;
use crate::utils::error::{GatewayError, Result};

/// Usage accumulated by one user within one period
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct QuotaUsage {
    pub requests: u64,
    pub tokens: u64,
}

/// Tracks and enforces monthly per-user limits
pub struct QuotaTracker {
    limits: QuotaConfig,
    counters: RwLock<HashMap<(String, String), QuotaUsage>>,
}

impl QuotaTracker {
    pub fn new(limits: QuotaConfig) -> Self {
        Self {
            limits,
            counters: RwLock::new(HashMap::new()),
        }
    }

    pub fn limits(&self) -> QuotaConfig {
        self.limits
    }

    /// Current `YYYY-MM` period key
    fn current_period() -> String {
        Utc::now().format("%Y-%m").to_string()
    }

    /// Error when the user has exhausted either monthly limit
    pub fn check(&self, user_id: &str) -> Result<()> {
        let usage = self.usage(user_id);

        if self.limits.monthly_requests > 0 && usage.requests >= self.limits.monthly_requests {
            return Err(GatewayError::QuotaExceeded(format!(
                "monthly request limit of {} reached",
                self.limits.monthly_requests
            )));
        }
        if self.limits.monthly_tokens > 0 && usage.tokens >= self.limits.monthly_tokens {
            return Err(GatewayError::QuotaExceeded(format!(
                "monthly token limit of {} reached",
                self.limits.monthly_tokens
            )));
        }
        Ok(())
    }

    /// Count one completed request against the user's current period
    pub fn record(&self, user_id: &str, usage: &TokenUsage) {
        let key = (user_id.to_string(), Self::current_period());
        let mut counters = self.counters.write();
        let entry = counters.entry(key).or_default();
        entry.requests += 1;
        entry.tokens += usage.total_tokens as u64;
        debug!(
            user_id,
            requests = entry.requests,
            tokens = entry.tokens,
            "quota updated"
        );
    }

    /// Usage for the user's current period
    pub fn usage(&self, user_id: &str) -> QuotaUsage {
        let key = (user_id.to_string(), Self::current_period());
        self.counters.read().get(&key).copied().unwrap_or_default()
    }
}
