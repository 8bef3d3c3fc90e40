//! AI prompt endpoints: improve and generate

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{monitoring, require_user, ApiResponse};
use crate::core::factory::{self, PromptOptions};
use crate::core::types::{GenerationResponse, TokenUsage};
use crate::server::state::AppState;
use crate::storage::UsageRecord;
use crate::utils::error::{GatewayError, Result};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // the scope owns every /api/ai path; a sibling route after it would
    // never be consulted
    cfg.service(
        web::scope("/api/ai")
            .route("/improve", web::post().to(improve))
            .route("/generate", web::post().to(generate))
            .route("/monitoring", web::get().to(monitoring::monitoring)),
    );
}

/// Request body for both AI endpoints
#[derive(Debug, Deserialize)]
pub struct AiRequest {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Response body for both AI endpoints
#[derive(Debug, Serialize)]
pub struct AiResponseBody {
    pub result: String,
    pub provider: String,
    pub model: String,
    pub usage: TokenUsage,
    pub cost: f64,
    pub latency_ms: u64,
}

fn validate_request(body: &AiRequest, max_prompt_chars: usize) -> Result<()> {
    if body.prompt.trim().is_empty() {
        return Err(GatewayError::Validation("prompt must not be empty".into()));
    }
    if body.prompt.chars().count() > max_prompt_chars {
        return Err(GatewayError::Validation(format!(
            "prompt exceeds the {} character limit",
            max_prompt_chars
        )));
    }
    if let Some(t) = body.temperature {
        if !(0.0..=2.0).contains(&t) {
            return Err(GatewayError::Validation(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }
    }
    Ok(())
}

/// Improve a drafted prompt
pub async fn improve(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AiRequest>,
) -> Result<HttpResponse> {
    run_ai_operation(&state, &req, body.into_inner(), "improve").await
}

/// Generate a prompt from a goal description
pub async fn generate(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AiRequest>,
) -> Result<HttpResponse> {
    run_ai_operation(&state, &req, body.into_inner(), "generate").await
}

async fn run_ai_operation(
    state: &AppState,
    req: &HttpRequest,
    body: AiRequest,
    operation: &str,
) -> Result<HttpResponse> {
    let user_id = require_user(req)?;
    validate_request(&body, state.config.server.max_prompt_chars)?;
    state.quota.check(&user_id)?;

    info!(user_id, operation, "ai request accepted");

    let options = PromptOptions {
        model: body.model,
        temperature: body.temperature,
        max_tokens: body.max_tokens,
        user: Some(user_id.clone()),
    };
    let fallback = state.config.router.fallback_enabled;

    let response: GenerationResponse = match operation {
        "improve" => factory::improve_prompt(&state.manager, &body.prompt, options, fallback).await,
        _ => factory::generate_prompt(&state.manager, &body.prompt, options, fallback).await,
    }?;

    state.quota.record(&user_id, &response.usage);
    state
        .usage
        .append(UsageRecord::new(&user_id, operation, &response))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AiResponseBody {
        result: response.content,
        provider: response.provider,
        model: response.model,
        usage: response.usage,
        cost: response.cost,
        latency_ms: response.latency_ms,
    })))
}
