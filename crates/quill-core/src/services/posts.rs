//! Post lifecycle service: creation, partial update, status transitions,
//! cover image replacement, view counting, deletion cascades, listings.

use std::str::FromStr;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostPatch, PostStatus, Tag};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageRequest, SortDirection, SortField};
use crate::ports::{
    CategoryRepository, CommentRepository, ImageStore, LikeRepository, PostRepository,
    TagRepository, UserRepository, public_id_from_url,
};
use crate::projection::{PostDetail, PostPreview, PostSummary, StatusView};
use crate::validate;

/// What to do with tag ids that do not resolve on create/update.
///
/// `Lenient` silently drops them (observed upstream behavior); `Strict`
/// fails the whole request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagAttachPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Input for post creation.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
    tag_policy: TagAttachPolicy,
}

impl PostService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        likes: Arc<dyn LikeRepository>,
        users: Arc<dyn UserRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            comments,
            likes,
            users,
            images,
            tag_policy: TagAttachPolicy::default(),
        }
    }

    pub fn with_tag_policy(mut self, policy: TagAttachPolicy) -> Self {
        self.tag_policy = policy;
        self
    }

    /// Create a new draft post for the given author.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        new_post: NewPost,
    ) -> Result<PostDetail, DomainError> {
        validate::post_title(&new_post.title)?;
        validate::post_content(&new_post.content)?;

        if self.categories.find_by_id(new_post.category_id).await?.is_none() {
            return Err(DomainError::not_found("Category", new_post.category_id));
        }

        let tag_ids = self.resolve_tags(&new_post.tag_ids).await?;

        let post = Post::new(
            author_id,
            new_post.title,
            new_post.content,
            new_post.category_id,
            tag_ids,
        );
        tracing::debug!(post_id = %post.id, author_id = %author_id, "Creating post");

        let saved = self.posts.save(post).await?;
        self.detail(saved).await
    }

    /// Apply a partial update. Only fields present in the patch are written;
    /// a present-but-empty tag list clears all tags.
    pub async fn update_post(&self, id: Uuid, patch: PostPatch) -> Result<PostDetail, DomainError> {
        if let Some(title) = &patch.title {
            validate::post_title(title)?;
        }
        if let Some(content) = &patch.content {
            validate::post_content(content)?;
        }

        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        if let Some(category_id) = patch.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                return Err(DomainError::not_found("Category", category_id));
            }
            post.category_id = category_id;
        }

        if let Some(tag_ids) = &patch.tag_ids {
            post.set_tags(self.resolve_tags(tag_ids).await?);
        }

        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(url) = patch.cover_image_url {
            post.cover_image_url = Some(url);
        }
        post.touch();

        tracing::debug!(post_id = %id, "Updating post");
        let saved = self.posts.save(post).await?;
        self.detail(saved).await
    }

    /// Load a post with its associations resolved. Counts one view: the
    /// increment is a relative store-level update, so it stays exact under
    /// concurrent readers.
    pub async fn get_post(&self, id: Uuid) -> Result<PostDetail, DomainError> {
        match self.posts.increment_views(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(DomainError::not_found("Post", id)),
            Err(e) => return Err(e.into()),
        }

        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;
        self.detail(post).await
    }

    /// Status is a total function: any status may transition to any other.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PostStatus,
    ) -> Result<StatusView, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        tracing::debug!(post_id = %id, from = %post.status, to = %status, "Updating post status");
        post.status = status;
        post.touch();

        let saved = self.posts.save(post).await?;
        Ok(StatusView {
            id: saved.id,
            status: saved.status,
            updated_at: saved.updated_at,
        })
    }

    /// Replace the cover image. The old image is deleted at the image store
    /// first; a store failure aborts the whole operation.
    pub async fn update_image(&self, id: Uuid, image_url: String) -> Result<PostDetail, DomainError> {
        let mut post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        self.delete_cover_image(&post).await?;

        post.cover_image_url = Some(image_url);
        post.touch();

        let saved = self.posts.save(post).await?;
        self.detail(saved).await
    }

    /// Delete a post, its comments and likes, and its cover image.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))?;

        self.delete_cover_image(&post).await?;

        let likes = self.likes.delete_by_post(id).await?;
        let comments = self.comments.delete_by_post(id).await?;
        self.posts.delete(id).await?;

        tracing::info!(post_id = %id, likes, comments, "Deleted post with cascades");
        Ok(())
    }

    /// Paginated listing over every post, any status.
    pub async fn list_posts(&self, req: &PageRequest) -> Result<Page<PostSummary>, DomainError> {
        let page = self.posts.find_page(req).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for post in &page.items {
            let comments = self.comments.count_by_post(post.id).await?;
            let likes = self.likes.count_by_post(post.id).await?;
            items.push(PostSummary::project(post, comments, likes));
        }
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    /// Paginated listing of published posts. The requested sort field is
    /// honored; direction is always descending (the published listing has no
    /// direction parameter).
    pub async fn list_published(
        &self,
        page: u64,
        size: u64,
        sort: SortField,
    ) -> Result<Page<PostPreview>, DomainError> {
        let req = PageRequest::new(page, size, sort, SortDirection::Desc)?;
        let page = self.posts.find_published_page(&req).await?;
        let mut items = Vec::with_capacity(page.items.len());
        for post in &page.items {
            items.push(self.preview(post).await?);
        }
        Ok(Page {
            items,
            page: page.page,
            size: page.size,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    /// Published posts in a category, newest first. An unknown category
    /// yields an empty list, not an error.
    pub async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<PostPreview>, DomainError> {
        let posts = self.posts.find_published_by_category(category_id).await?;
        self.previews(posts).await
    }

    /// Published posts carrying a tag, newest first. Unknown tag id yields
    /// an empty list.
    pub async fn list_by_tag_id(&self, tag_id: Uuid) -> Result<Vec<PostPreview>, DomainError> {
        let posts = self.posts.find_published_by_tag(tag_id).await?;
        self.previews(posts).await
    }

    /// Same as [`Self::list_by_tag_id`] but resolving the tag by name first.
    pub async fn list_by_tag_name(&self, name: &str) -> Result<Vec<PostPreview>, DomainError> {
        let normalized = Tag::normalize(name);
        match self.tags.find_by_name(&normalized).await? {
            Some(tag) => self.list_by_tag_id(tag.id).await,
            None => Ok(Vec::new()),
        }
    }

    /// Resolve requested tag ids against the association store according to
    /// the configured policy.
    async fn resolve_tags(&self, requested: &[Uuid]) -> Result<Vec<Uuid>, DomainError> {
        if requested.is_empty() {
            return Ok(Vec::new());
        }
        let found = self.tags.find_by_ids(requested).await?;
        if self.tag_policy == TagAttachPolicy::Strict {
            for id in requested {
                if !found.iter().any(|t| t.id == *id) {
                    return Err(DomainError::not_found("Tag", *id));
                }
            }
        }
        Ok(found.into_iter().map(|t| t.id).collect())
    }

    async fn delete_cover_image(&self, post: &Post) -> Result<(), DomainError> {
        let Some(url) = &post.cover_image_url else {
            return Ok(());
        };
        let Some(public_id) = public_id_from_url(url) else {
            return Ok(());
        };
        self.images.delete(public_id).await.map_err(|e| {
            tracing::error!(post_id = %post.id, error = %e, "Image store delete failed");
            DomainError::Dependency(e.to_string())
        })
    }

    async fn detail(&self, post: Post) -> Result<PostDetail, DomainError> {
        let category = self
            .categories
            .find_by_id(post.category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", post.category_id))?;
        let tags = self.tags.find_by_ids(&post.tag_ids).await?;
        let author = self.users.find_by_id(post.author_id).await?;
        let comments = self.comments.count_by_post(post.id).await?;
        let likes = self.likes.count_by_post(post.id).await?;
        Ok(PostDetail::project(
            &post,
            author.as_ref(),
            &category,
            &tags,
            comments,
            likes,
        ))
    }

    async fn preview(&self, post: &Post) -> Result<PostPreview, DomainError> {
        let category = self
            .categories
            .find_by_id(post.category_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category", post.category_id))?;
        let tags = self.tags.find_by_ids(&post.tag_ids).await?;
        let author = self.users.find_by_id(post.author_id).await?;
        let comments = self.comments.count_by_post(post.id).await?;
        let likes = self.likes.count_by_post(post.id).await?;
        Ok(PostPreview::project(
            post,
            author.as_ref(),
            &category,
            &tags,
            comments,
            likes,
        ))
    }

    async fn previews(&self, posts: Vec<Post>) -> Result<Vec<PostPreview>, DomainError> {
        let mut out = Vec::with_capacity(posts.len());
        for post in &posts {
            out.push(self.preview(post).await?);
        }
        Ok(out)
    }
}

/// Parse caller-supplied sort parameters, failing fast on unknown values.
pub fn parse_sort(sort_by: &str, direction: &str) -> Result<(SortField, SortDirection), DomainError> {
    Ok((SortField::from_str(sort_by)?, SortDirection::from_str(direction)?))
}
