use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Like, Post, Tag, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Fails with `RepoError::NotFound` when no
    /// row was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Listings that serve readers are restricted to published
/// posts; `find_by_category` sees every status and exists for cascades.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_published_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError>;

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Published posts in a category, newest first.
    async fn find_published_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Published posts carrying a tag, newest first.
    async fn find_published_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Atomically add 1 to the view counter. Must be a relative update at
    /// the store ("views = views + 1"), never a read-modify-write, so
    /// concurrent readers cannot lose increments.
    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn find_all(&self) -> Result<Vec<Category>, RepoError>;
}

#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Bulk lookup. Returns only the tags that exist; unknown ids are simply
    /// absent from the result.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError>;

    /// Lookup by normalized name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    async fn find_all(&self) -> Result<Vec<Tag>, RepoError>;

    /// Remove the tag from every post that carries it.
    async fn detach_from_posts(&self, tag_id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    /// Cascade helper: delete every comment referencing the post. Returns
    /// the number of rows removed.
    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// Like ledger. `save` of a duplicate (user_id, post_id) pair must surface
/// `RepoError::Constraint` so a lost toggle race becomes a handled conflict.
#[async_trait]
pub trait LikeRepository: BaseRepository<Like, Uuid> {
    async fn find_by_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Like>, RepoError>;

    async fn exists_by_user_and_post(&self, user_id: Uuid, post_id: Uuid)
    -> Result<bool, RepoError>;

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn find_all(&self) -> Result<Vec<User>, RepoError>;
}
