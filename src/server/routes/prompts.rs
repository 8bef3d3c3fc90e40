//! Prompt template CRUD endpoints

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::{require_user, ApiResponse};
use crate::server::state::AppState;
use crate::storage::{NewPromptTemplate, PromptUpdate};
use crate::utils::error::{GatewayError, Result};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/prompts")
            .route("", web::post().to(create))
            .route("", web::get().to(list))
            .route("/{id}", web::get().to(get))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .route("/{id}/share", web::post().to(share)),
    );
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// List community-visible templates instead of the caller's own
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShareBody {
    pub is_public: bool,
}

fn validate_new(new: &NewPromptTemplate) -> Result<()> {
    if new.title.trim().is_empty() {
        return Err(GatewayError::Validation("title must not be empty".into()));
    }
    if new.content.trim().is_empty() {
        return Err(GatewayError::Validation("content must not be empty".into()));
    }
    Ok(())
}

pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewPromptTemplate>,
) -> Result<HttpResponse> {
    let user_id = require_user(&req)?;
    let new = body.into_inner();
    validate_new(&new)?;
    let template = state.prompts.create(&user_id, new).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(template)))
}

pub async fn list(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let templates = if query.public {
        state.prompts.list_public().await?
    } else {
        let user_id = require_user(&req)?;
        state.prompts.list_for_user(&user_id).await?
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(templates)))
}

pub async fn get(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = require_user(&req)?;
    let id = path.into_inner();
    let template = state
        .prompts
        .get(id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("prompt {}", id)))?;

    // owners see their own; everyone sees public templates
    if template.user_id != user_id && !template.is_public {
        return Err(GatewayError::Forbidden(
            "prompt belongs to another user".into(),
        ));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(template)))
}

pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<PromptUpdate>,
) -> Result<HttpResponse> {
    let user_id = require_user(&req)?;
    let template = state
        .prompts
        .update(path.into_inner(), &user_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(template)))
}

pub async fn delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = require_user(&req)?;
    state.prompts.delete(path.into_inner(), &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn share(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<ShareBody>,
) -> Result<HttpResponse> {
    let user_id = require_user(&req)?;
    let template = state
        .prompts
        .set_visibility(path.into_inner(), &user_id, body.is_public)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(template)))
}
