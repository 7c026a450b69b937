//! Category management. Deleting a category cascades to its posts and their
//! interactions; cover images are not released here (the cascade mirrors a
//! storage-layer cascade, which never talks to the image store).

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Category;
use crate::error::DomainError;
use crate::ports::{CategoryRepository, CommentRepository, LikeRepository, PostRepository};
use crate::validate;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self { categories, posts, comments, likes }
    }

    pub async fn create_category(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Category, DomainError> {
        validate::category_name(&name)?;
        tracing::info!(category_name = %name, "Creating category");
        let saved = self.categories.save(Category::new(name, description)).await?;
        Ok(saved)
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", id))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.find_all().await?)
    }

    /// Delete a category along with every post attached to it, including
    /// those posts' comments and likes.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        if self.categories.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Category", id));
        }

        let posts = self.posts.find_by_category(id).await?;
        let removed = posts.len();
        for post in posts {
            self.likes.delete_by_post(post.id).await?;
            self.comments.delete_by_post(post.id).await?;
            self.posts.delete(post.id).await?;
        }
        self.categories.delete(id).await?;

        tracing::info!(category_id = %id, posts = removed, "Deleted category with cascades");
        Ok(())
    }
}
