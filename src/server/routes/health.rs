//! Service liveness endpoint

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ApiResponse;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

#[derive(Debug, Serialize)]
struct LivenessStatus {
    status: &'static str,
    version: &'static str,
    timestamp: DateTime<Utc>,
}

/// Liveness probe for load balancers; provider health lives under
/// `/api/ai/monitoring`
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(LivenessStatus {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    }))
}
