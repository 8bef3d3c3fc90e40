//! Provider manager: registry, selection, stats and health tracking

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::strategy::RoutingStrategy;
use crate::core::providers::LlmProvider;
use crate::core::types::{
    GenerationRequest, GenerationResponse, HealthState, ProviderHealth, ProviderStats,
};
use crate::utils::error::{GatewayError, Result};

struct RegisteredProvider {
    provider: Arc<dyn LlmProvider>,
    enabled: AtomicBool,
}

/// Registry of provider adapters with per-provider observability counters.
///
/// Stats and health live in memory only and are rebuilt on restart. A
/// provider receives traffic while it is enabled and its last health probe
/// (if any ran) was not `Unhealthy`.
pub struct ProviderManager {
    providers: Vec<RegisteredProvider>,
    strategy: RoutingStrategy,
    round_robin_cursor: AtomicUsize,
    stats: RwLock<HashMap<String, ProviderStats>>,
    health: RwLock<HashMap<String, ProviderHealth>>,
}

impl ProviderManager {
    pub fn new(strategy: RoutingStrategy) -> Self {
        info!(%strategy, "creating provider manager");
        Self {
            providers: Vec::new(),
            strategy,
            round_robin_cursor: AtomicUsize::new(0),
            stats: RwLock::new(HashMap::new()),
            health: RwLock::new(HashMap::new()),
        }
    }

    /// Register an adapter. Registration order defines fallback order.
    pub fn register(&mut self, provider: Arc<dyn LlmProvider>) {
        info!(provider = provider.name(), "registering provider");
        self.stats
            .write()
            .insert(provider.name().to_string(), ProviderStats::default());
        self.providers.push(RegisteredProvider {
            provider,
            enabled: AtomicBool::new(true),
        });
    }

    pub fn strategy(&self) -> RoutingStrategy {
        self.strategy
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.provider.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Enable or disable a provider by name
    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let entry = self
            .providers
            .iter()
            .find(|p| p.provider.name() == name)
            .ok_or_else(|| GatewayError::ProviderNotFound(name.to_string()))?;
        entry.enabled.store(enabled, Ordering::Relaxed);
        info!(provider = name, enabled, "provider availability changed");
        Ok(())
    }

    /// Providers eligible for traffic, in registration order
    fn available(&self) -> Vec<Arc<dyn LlmProvider>> {
        let health = self.health.read();
        self.providers
            .iter()
            .filter(|p| p.enabled.load(Ordering::Relaxed))
            .filter(|p| {
                health
                    .get(p.provider.name())
                    .map(|h| h.state.is_available())
                    // never probed counts as available
                    .unwrap_or(true)
            })
            .map(|p| Arc::clone(&p.provider))
            .collect()
    }

    /// Pick one provider from the available set using the configured strategy
    pub fn select(&self) -> Result<Arc<dyn LlmProvider>> {
        let available = self.available();
        if available.is_empty() {
            return Err(GatewayError::NoProvidersAvailable(
                "no enabled, healthy providers registered".to_string(),
            ));
        }

        let selected = match self.strategy {
            RoutingStrategy::RoundRobin => {
                let index =
                    self.round_robin_cursor.fetch_add(1, Ordering::Relaxed) % available.len();
                Arc::clone(&available[index])
            }
            RoutingStrategy::LeastUsed => {
                let stats = self.stats.read();
                let least = available
                    .iter()
                    .min_by_key(|p| {
                        stats
                            .get(p.name())
                            .map(|s| s.total_requests)
                            .unwrap_or(0)
                    })
                    .expect("available is non-empty");
                Arc::clone(least)
            }
            RoutingStrategy::LowestLatency => {
                let stats = self.stats.read();
                // unprobed providers have 0.0 mean and are tried first
                let fastest = available
                    .iter()
                    .min_by(|a, b| {
                        let la = stats.get(a.name()).map(|s| s.avg_latency_ms).unwrap_or(0.0);
                        let lb = stats.get(b.name()).map(|s| s.avg_latency_ms).unwrap_or(0.0);
                        la.total_cmp(&lb)
                    })
                    .expect("available is non-empty");
                Arc::clone(fastest)
            }
            RoutingStrategy::LowestCost => {
                // min_by keeps the earliest element on ties
                let cheapest = available
                    .iter()
                    .min_by(|a, b| {
                        a.default_model_cost_per_1k()
                            .total_cmp(&b.default_model_cost_per_1k())
                    })
                    .expect("available is non-empty");
                Arc::clone(cheapest)
            }
        };

        debug!(provider = selected.name(), strategy = %self.strategy, "selected provider");
        Ok(selected)
    }

    /// Route one request to the strategy-selected provider
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let provider = self.select()?;
        match provider.generate(request).await {
            Ok(response) => {
                self.record_success(&response);
                Ok(response)
            }
            Err(err) => {
                self.record_failure(provider.name());
                warn!(provider = provider.name(), error = %err, "generation failed");
                Err(GatewayError::Provider(err))
            }
        }
    }

    /// Try every available provider in registration order until one
    /// succeeds. Each failure is swallowed with a warning; the call errors
    /// only when the whole registry is exhausted.
    pub async fn generate_with_fallback(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse> {
        let available = self.available();
        if available.is_empty() {
            return Err(GatewayError::NoProvidersAvailable(
                "no enabled, healthy providers registered".to_string(),
            ));
        }

        let mut attempted = Vec::with_capacity(available.len());
        let mut last_error = None;

        for provider in &available {
            attempted.push(provider.name().to_string());
            match provider.generate(request).await {
                Ok(response) => {
                    self.record_success(&response);
                    if attempted.len() > 1 {
                        info!(
                            provider = provider.name(),
                            attempts = attempted.len(),
                            "fallback succeeded"
                        );
                    }
                    return Ok(response);
                }
                Err(err) => {
                    self.record_failure(provider.name());
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        retryable = err.is_retryable(),
                        "provider failed, trying next"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(GatewayError::AllProvidersFailed {
            attempted,
            last_error: last_error.expect("at least one provider was attempted"),
        })
    }

    fn record_success(&self, response: &GenerationResponse) {
        if let Some(stats) = self.stats.write().get_mut(&response.provider) {
            stats.record_success(response.latency_ms, response.cost, response.usage.total_tokens);
        }
    }

    fn record_failure(&self, provider: &str) {
        if let Some(stats) = self.stats.write().get_mut(provider) {
            stats.record_failure();
        }
    }

    /// Probe every registered provider and store the results
    pub async fn check_health_all(&self) -> HashMap<String, ProviderHealth> {
        let mut results = HashMap::with_capacity(self.providers.len());
        for entry in &self.providers {
            let name = entry.provider.name();
            let result = entry.provider.health_check().await;

            let previous = self.health.read().get(name).map(|h| h.state);
            if previous.is_some() && previous != Some(result.state) {
                info!(
                    provider = name,
                    from = ?previous,
                    to = ?result.state,
                    "provider health transition"
                );
            } else if result.state != HealthState::Healthy {
                warn!(provider = name, state = ?result.state, error = ?result.error, "provider unhealthy");
            }

            self.health
                .write()
                .insert(name.to_string(), result.clone());
            results.insert(name.to_string(), result);
        }
        results
    }

    /// Snapshot of per-provider stats
    pub fn stats(&self) -> HashMap<String, ProviderStats> {
        self.stats.read().clone()
    }

    /// Snapshot of the last health probe results
    pub fn health(&self) -> HashMap<String, ProviderHealth> {
        self.health.read().clone()
    }

    /// Stats for one provider
    pub fn provider_stats(&self, name: &str) -> Option<ProviderStats> {
        self.stats.read().get(name).cloned()
    }
}

impl std::fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderManager")
            .field("strategy", &self.strategy)
            .field("providers", &self.provider_names())
            .finish()
    }
}
