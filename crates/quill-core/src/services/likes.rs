//! Like toggling. The toggle alternates per call (a UI "like button"), not
//! idempotent in the call-twice-same-state sense.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::Like;
use crate::error::{DomainError, RepoError};
use crate::ports::{LikeRepository, PostRepository, UserRepository};

/// Like state of a (user, post) pair plus the fresh total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub like_count: u64,
    pub has_user_liked: bool,
    pub message: String,
}

pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikeRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { likes, posts, users }
    }

    /// Toggle the like for a (user, post) pair: delete it if present, create
    /// it otherwise. The like count is recomputed with a fresh count query,
    /// never an in-memory increment, so concurrent toggles cannot drift it.
    pub async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeStatus, DomainError> {
        tracing::debug!(%user_id, %post_id, "Toggling like");

        if !self.users.exists(user_id).await? {
            return Err(DomainError::not_found("User", user_id));
        }
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let (has_user_liked, message) =
            match self.likes.find_by_user_and_post(user_id, post_id).await? {
                Some(existing) => match self.likes.delete(existing.id).await {
                    // A concurrent toggle already removed it; same outcome.
                    Ok(()) | Err(RepoError::NotFound) => (false, "Post unliked successfully"),
                    Err(e) => return Err(e.into()),
                },
                None => match self.likes.save(Like::new(user_id, post_id)).await {
                    Ok(_) => (true, "Post liked successfully"),
                    // Lost the insert race: the pair exists, which is the
                    // state we wanted to reach.
                    Err(RepoError::Constraint(_)) => (true, "Post liked successfully"),
                    Err(e) => return Err(e.into()),
                },
            };

        let like_count = self.likes.count_by_post(post_id).await?;
        Ok(LikeStatus {
            like_count,
            has_user_liked,
            message: message.to_string(),
        })
    }

    /// Read-only like state; requires the post to exist but not the like.
    pub async fn like_info(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeStatus, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        let has_user_liked = self.likes.exists_by_user_and_post(user_id, post_id).await?;
        let like_count = self.likes.count_by_post(post_id).await?;
        let message = if has_user_liked {
            "User has liked this post"
        } else {
            "User has not liked this post"
        };
        Ok(LikeStatus {
            like_count,
            has_user_liked,
            message: message.to_string(),
        })
    }
}
