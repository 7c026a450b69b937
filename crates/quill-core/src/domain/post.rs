use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Publication state of a post.
///
/// Transitions are unconstrained: any state may move to any other state,
/// including back out of `Archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            "ARCHIVED" => Ok(PostStatus::Archived),
            other => Err(DomainError::Validation(format!(
                "unknown post status: {other}"
            ))),
        }
    }
}

/// Post aggregate root.
///
/// Owns its scalar fields and its tag-set membership. Comments and likes are
/// independently owned records that reference the post by id; the only
/// cross-ownership rule is that deleting a post deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub tag_ids: Vec<Uuid>,
    pub title: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft post with zero views.
    pub fn new(
        author_id: Uuid,
        title: String,
        content: String,
        category_id: Uuid,
        tag_ids: Vec<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id,
            tag_ids: dedup_ids(tag_ids),
            title,
            content,
            cover_image_url: None,
            status: PostStatus::Draft,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the full tag set. The invariant that the set contains no
    /// duplicate ids holds regardless of the input.
    pub fn set_tags(&mut self, tag_ids: Vec<Uuid>) {
        self.tag_ids = dedup_ids(tag_ids);
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial update for a post. Absent fields are never touched; for tags the
/// presence of the field controls replacement, so `Some(vec![])` clears all
/// tags while `None` leaves them unchanged.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_ids: Option<Vec<Uuid>>,
}

fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_is_draft_with_zero_views() {
        let post = Post::new(
            Uuid::new_v4(),
            "Hello".into(),
            "<p>world</p>".into(),
            Uuid::new_v4(),
            vec![],
        );
        assert_eq!(post.status, PostStatus::Draft);
        assert_eq!(post.views, 0);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn tag_set_drops_duplicates_preserving_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut post = Post::new(
            Uuid::new_v4(),
            "Hello".into(),
            "x".into(),
            Uuid::new_v4(),
            vec![a, b, a],
        );
        assert_eq!(post.tag_ids, vec![a, b]);

        post.set_tags(vec![b, b, a]);
        assert_eq!(post.tag_ids, vec![b, a]);
    }

    #[test]
    fn status_parses_case_insensitively_and_rejects_unknown() {
        assert_eq!("published".parse::<PostStatus>().unwrap(), PostStatus::Published);
        assert_eq!("ARCHIVED".parse::<PostStatus>().unwrap(), PostStatus::Archived);
        assert!("retired".parse::<PostStatus>().is_err());
    }
}
