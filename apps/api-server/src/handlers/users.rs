//! User profile handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{User, UserPatch};
use quill_shared::ApiResponse;
use quill_shared::dto::{PictureUploadQuery, UserResponse, UserUpdateRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        profile_picture_url: user.profile_picture_url,
    }
}

/// GET /api/users
pub async fn list(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let users = state.profiles.list_users().await?;
    let users: Vec<UserResponse> = users.into_iter().map(response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// PUT /api/users/{id}/profile - partial update; absent fields are untouched.
pub async fn update_profile(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UserUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = UserPatch {
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    };

    let user = state.profiles.edit_profile(path.into_inner(), patch).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response(user))))
}

/// PATCH /api/users/{id}/profile-picture - raw image bytes in the body, the
/// original filename in the `filename` query parameter.
pub async fn update_picture(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    query: web::Query<PictureUploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let user = state
        .profiles
        .update_profile_picture(path.into_inner(), body.to_vec(), &query.filename)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response(user))))
}
