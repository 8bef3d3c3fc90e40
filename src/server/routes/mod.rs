//! HTTP routes

pub mod ai;
pub mod health;
pub mod monitoring;
pub mod prompts;

use actix_web::{web, HttpRequest};
use serde::Serialize;

use crate::utils::error::{GatewayError, Result};

/// Header carrying the caller's identity. Session handling lives in the
/// fronting application; this service trusts the forwarded id.
pub const USER_HEADER: &str = "x-user-id";

/// Uniform JSON envelope for successful responses
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Extract the calling user's id, rejecting anonymous requests
pub fn require_user(req: &HttpRequest) -> Result<String> {
    req.headers()
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| GatewayError::Unauthorized(format!("missing {} header", USER_HEADER)))
}

/// Register every route group on the app. The monitoring endpoint lives
/// inside the `/api/ai` scope registered by `ai::configure_routes`.
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    ai::configure_routes(cfg);
    prompts::configure_routes(cfg);
}
