//! Comment management. Comments live independently of the post lifecycle
//! but require both user and post to exist at creation time. Deletion has
//! no ownership check; callers enforcing ownership must do so above the
//! core.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Comment;
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};
use crate::validate;

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { comments, posts, users }
    }

    pub async fn create_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        content: String,
    ) -> Result<Comment, DomainError> {
        validate::comment_content(&content)?;

        if !self.users.exists(user_id).await? {
            return Err(DomainError::not_found("User", user_id));
        }
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("Post", post_id));
        }

        tracing::debug!(%user_id, %post_id, "Creating comment");
        let saved = self.comments.save(Comment::new(user_id, post_id, content)).await?;
        Ok(saved)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))
    }

    /// Only the content field is applied; updated_at is bumped.
    pub async fn update_comment(&self, id: Uuid, content: String) -> Result<Comment, DomainError> {
        validate::comment_content(&content)?;

        let mut comment = self
            .comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment", id))?;

        comment.content = content;
        comment.updated_at = Utc::now();
        let saved = self.comments.save(comment).await?;
        Ok(saved)
    }

    /// Unconditional hard delete.
    pub async fn delete_comment(&self, id: Uuid) -> Result<(), DomainError> {
        if self.comments.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Comment", id));
        }
        tracing::debug!(comment_id = %id, "Deleting comment");
        self.comments.delete(id).await?;
        Ok(())
    }

    /// Every comment on a post, unpaginated.
    pub async fn list_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.find_by_post(post_id).await?)
    }
}
