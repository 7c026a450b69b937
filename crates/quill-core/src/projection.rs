//! Read-optimized projections of the post aggregate.
//!
//! Derivation rules that are part of the observable contract live here:
//! comment/like counts are whatever the ledger reports at mapping time
//! (never a stored counter), the excerpt is the first 200 characters plus a
//! literal ellipsis, and tags map to a deduplicated set of names.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Category, Post, PostStatus, Tag, User};

/// Maximum excerpt length, in characters.
pub const EXCERPT_LEN: usize = 200;

/// First 200 characters of content, with `...` appended when the content is
/// longer. Empty content yields an empty string.
pub fn excerpt(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let mut out: String = content.chars().take(EXCERPT_LEN).collect();
    if content.chars().count() > EXCERPT_LEN {
        out.push_str("...");
    }
    out
}

fn tag_names(tags: &[Tag]) -> HashSet<String> {
    tags.iter().map(|t| t.name.clone()).collect()
}

/// Minimal author reference embedded in projections.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
}

impl AuthorView {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Category reference embedded in the detail projection.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

/// Full single-post view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub views: u64,
    pub author: Option<AuthorView>,
    pub category: CategoryRef,
    pub tags: HashSet<String>,
    pub comments_count: u64,
    pub likes_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostDetail {
    pub fn project(
        post: &Post,
        author: Option<&User>,
        category: &Category,
        tags: &[Tag],
        comments_count: u64,
        likes_count: u64,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            cover_image_url: post.cover_image_url.clone(),
            status: post.status,
            views: post.views,
            author: author.map(AuthorView::from_user),
            category: CategoryRef {
                id: category.id,
                name: category.name.clone(),
            },
            tags: tag_names(tags),
            comments_count,
            likes_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Compact row for administrative listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub views: u64,
    pub comments_count: u64,
    pub likes_count: u64,
}

impl PostSummary {
    pub fn project(post: &Post, comments_count: u64, likes_count: u64) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created_at: post.created_at,
            views: post.views,
            comments_count,
            likes_count,
        }
    }
}

/// Reader-facing preview of a published post.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,
    pub published_at: DateTime<Utc>,
    pub views_count: u64,
    pub likes_count: u64,
    pub comments_count: u64,
    pub tags: HashSet<String>,
    pub category_name: String,
}

impl PostPreview {
    pub fn project(
        post: &Post,
        author: Option<&User>,
        category: &Category,
        tags: &[Tag],
        comments_count: u64,
        likes_count: u64,
    ) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            excerpt: excerpt(&post.content),
            cover_image_url: post.cover_image_url.clone(),
            author_name: author.map(|u| u.username.clone()),
            published_at: post.created_at,
            views_count: post.views,
            likes_count,
            comments_count,
            tags: tag_names(tags),
            category_name: category.name.clone(),
        }
    }
}

/// Result of a status transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub id: Uuid,
    pub status: PostStatus,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_of_empty_content_is_empty() {
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn short_content_passes_through_without_ellipsis() {
        assert_eq!(excerpt("<p>hello</p>"), "<p>hello</p>");
        let exactly = "x".repeat(200);
        assert_eq!(excerpt(&exactly), exactly);
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let content = "y".repeat(201);
        let e = excerpt(&content);
        assert_eq!(e.chars().count(), 203);
        assert!(e.ends_with("..."));
    }

    #[test]
    fn tag_names_deduplicate() {
        let tags = vec![Tag::new("rust".into()), Tag::new("rust".into())];
        assert_eq!(tag_names(&tags).len(), 1);
    }
}
