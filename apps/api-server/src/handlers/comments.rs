//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::ApiResponse;
use quill_shared::dto::{CommentCreateRequest, CommentUpdateRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CommentCreateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let comment = state
        .comments
        .create_comment(identity.user_id, req.post_id, req.content)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// GET /api/comments/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let comment = state.comments.get_comment(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// PUT /api/comments/{id} - content is the only mutable field.
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentUpdateRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .update_comment(path.into_inner(), body.into_inner().content)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment)))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.comments.delete_comment(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/{id}/comments
pub async fn list_by_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = state.comments.list_by_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(comments)))
}
