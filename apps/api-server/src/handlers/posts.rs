//! Post handlers: lifecycle, listings and projections.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PostPatch, PostStatus};
use quill_core::pagination::{PageRequest, SortField};
use quill_core::services::{NewPost, parse_sort};
use quill_shared::ApiResponse;
use quill_shared::dto::{
    CreatePostRequest, ListQuery, PostImageRequest, PostStatusRequest, PublishedQuery,
    UpdatePostRequest,
};

use super::envelope;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let detail = state
        .posts
        .create_post(
            identity.user_id,
            NewPost {
                title: req.title,
                content: req.content,
                category_id: req.category_id,
                tag_ids: req.tag_ids.unwrap_or_default(),
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok(detail)))
}

/// GET /api/posts - administrative listing, any status.
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner();
    let (sort, direction) = parse_sort(&q.sort_by, &q.direction)?;
    let req = PageRequest::new(q.page, q.size, sort, direction)?;

    let page = state.posts.list_posts(&req).await?;
    Ok(HttpResponse::Ok().json(envelope(page)))
}

/// GET /api/posts/published - reader-facing listing, newest first.
pub async fn list_published(
    state: web::Data<AppState>,
    query: web::Query<PublishedQuery>,
) -> AppResult<HttpResponse> {
    let q = query.into_inner();
    let sort = q.sort_by.parse::<SortField>()?;

    let page = state.posts.list_published(q.page, q.size, sort).await?;
    Ok(HttpResponse::Ok().json(envelope(page)))
}

/// GET /api/posts/{id} - counts one view per call.
pub async fn get(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.posts.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PUT /api/posts/{id} - partial update; absent fields are untouched.
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = PostPatch {
        title: req.title,
        content: req.content,
        cover_image_url: req.cover_image_url,
        category_id: req.category_id,
        tag_ids: req.tag_ids,
    };

    let detail = state.posts.update_post(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PATCH /api/posts/{id}/status
pub async fn update_status(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostStatusRequest>,
) -> AppResult<HttpResponse> {
    let status: PostStatus = body.into_inner().status.parse()?;
    let view = state.posts.update_status(path.into_inner(), status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
}

/// PATCH /api/posts/{id}/image
pub async fn update_image(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostImageRequest>,
) -> AppResult<HttpResponse> {
    let detail = state
        .posts
        .update_image(path.into_inner(), body.into_inner().image_url)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.posts.delete_post(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/posts/category/{category_id} - published posts only.
pub async fn list_by_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let previews = state.posts.list_by_category(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(previews)))
}

/// GET /api/posts/tag/{tag_id} - published posts only.
pub async fn list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let previews = state.posts.list_by_tag_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(previews)))
}

/// GET /api/posts/tag/name/{name}
pub async fn list_by_tag_name(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let previews = state.posts.list_by_tag_name(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(previews)))
}
