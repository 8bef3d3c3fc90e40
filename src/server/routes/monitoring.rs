//! Provider monitoring endpoint, registered under the `/api/ai` scope

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiResponse;
use crate::core::types::{ProviderHealth, ProviderStats};
use crate::server::state::AppState;
use crate::utils::error::Result;

#[derive(Debug, Deserialize)]
pub struct MonitoringQuery {
    /// Run a fresh health sweep before reporting
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct ProviderReport {
    pub name: String,
    pub stats: ProviderStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<ProviderHealth>,
}

#[derive(Debug, Serialize)]
pub struct MonitoringReport {
    pub strategy: String,
    pub providers: Vec<ProviderReport>,
    pub total_requests: u64,
    pub total_cost: f64,
    pub total_tokens: u64,
}

/// Per-provider health and usage statistics
pub async fn monitoring(
    state: web::Data<AppState>,
    query: web::Query<MonitoringQuery>,
) -> Result<HttpResponse> {
    debug!(refresh = query.refresh, "monitoring report requested");

    if query.refresh {
        state.manager.check_health_all().await;
    }

    let stats = state.manager.stats();
    let health = state.manager.health();

    let mut providers: Vec<ProviderReport> = state
        .manager
        .provider_names()
        .into_iter()
        .map(|name| ProviderReport {
            name: name.to_string(),
            stats: stats.get(name).cloned().unwrap_or_default(),
            health: health.get(name).cloned(),
        })
        .collect();
    providers.sort_by(|a, b| a.name.cmp(&b.name));

    let report = MonitoringReport {
        strategy: state.manager.strategy().to_string(),
        total_requests: providers.iter().map(|p| p.stats.total_requests).sum(),
        total_cost: providers.iter().map(|p| p.stats.total_cost).sum(),
        total_tokens: providers.iter().map(|p| p.stats.total_tokens).sum(),
        providers,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}
