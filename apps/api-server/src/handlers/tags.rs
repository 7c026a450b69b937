//! Tag handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::TagCreateRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/tags - the name is normalized before storage.
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<TagCreateRequest>,
) -> AppResult<HttpResponse> {
    let tag = state.tags.create_tag(&body.into_inner().name).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(tag)))
}

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list_tags().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tags)))
}

/// GET /api/tags/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let tag = state.tags.get_tag(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(tag)))
}

/// DELETE /api/tags/{id} - detaches the tag from every post first.
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.tags.delete_tag(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
