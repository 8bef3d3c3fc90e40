//! Per-provider running statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running counters for one provider, kept in memory by the manager.
///
/// Counters are rebuilt from zero on restart; they feed routing decisions
/// (least-used, lowest-latency) and the monitoring endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Total requests attempted, successful or not
    pub total_requests: u64,
    /// Requests that returned a response
    pub successful_requests: u64,
    /// Requests that errored
    pub failed_requests: u64,
    /// Running mean latency over successful requests, in milliseconds
    pub avg_latency_ms: f64,
    /// Accumulated estimated cost in USD
    pub total_cost: f64,
    /// Accumulated token count (prompt + completion)
    pub total_tokens: u64,
    /// Timestamp of the most recent attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ProviderStats {
    /// Record a successful request. Latency feeds the running mean.
    pub fn record_success(&mut self, latency_ms: u64, cost: f64, tokens: u32) {
        self.total_requests += 1;
        self.successful_requests += 1;
        // Running mean over successes only; failures have no meaningful latency
        let n = self.successful_requests as f64;
        self.avg_latency_ms += (latency_ms as f64 - self.avg_latency_ms) / n;
        self.total_cost += cost;
        self.total_tokens += tokens as u64;
        self.last_used_at = Some(Utc::now());
    }

    /// Record a failed request. Counts only; latency and cost are untouched.
    pub fn record_failure(&mut self) {
        self.total_requests += 1;
        self.failed_requests += 1;
        self.last_used_at = Some(Utc::now());
    }

    /// Success rate between 0.0 and 1.0; 1.0 when no requests were made
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 1.0;
        }
        self.successful_requests as f64 / self.total_requests as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean_latency() {
        let mut stats = ProviderStats::default();
        stats.record_success(100, 0.01, 50);
        stats.record_success(300, 0.02, 70);
        assert_eq!(stats.total_requests, 2);
        assert!((stats.avg_latency_ms - 200.0).abs() < f64::EPSILON);
        assert!((stats.total_cost - 0.03).abs() < 1e-9);
        assert_eq!(stats.total_tokens, 120);
    }

    #[test]
    fn test_failure_does_not_move_latency() {
        let mut stats = ProviderStats::default();
        stats.record_success(100, 0.01, 10);
        stats.record_failure();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert!((stats.avg_latency_ms - 100.0).abs() < f64::EPSILON);
        assert!((stats.success_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_with_no_requests() {
        let stats = ProviderStats::default();
        assert!((stats.success_rate() - 1.0).abs() < f64::EPSILON);
    }
}
