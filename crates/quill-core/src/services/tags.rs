//! Tag management. Names are normalized before any check or write, and
//! uniqueness is double-guarded: a lookup first, then the storage constraint
//! for races the lookup cannot see.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Tag;
use crate::error::{DomainError, RepoError};
use crate::ports::TagRepository;
use crate::validate;

pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn create_tag(&self, raw_name: &str) -> Result<Tag, DomainError> {
        let name = Tag::normalize(raw_name);
        validate::tag_name(&name)?;

        tracing::info!(tag_name = %name, "Creating tag");
        if self.tags.exists_by_name(&name).await? {
            return Err(DomainError::AlreadyExists(format!(
                "Tag already exists with name: {name}"
            )));
        }

        match self.tags.save(Tag::new(name.clone())).await {
            Ok(tag) => Ok(tag),
            // Checked-then-inserted race: someone else created it between
            // the lookup and the insert.
            Err(RepoError::Constraint(_)) => Err(DomainError::AlreadyExists(format!(
                "Tag already exists with name: {name}"
            ))),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_tag(&self, id: Uuid) -> Result<Tag, DomainError> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", id))
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.find_all().await?)
    }

    /// Delete a tag, detaching it from every post that carries it.
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), DomainError> {
        if self.tags.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Tag", id));
        }
        self.tags.detach_from_posts(id).await?;
        self.tags.delete(id).await?;
        tracing::info!(tag_id = %id, "Deleted tag");
        Ok(())
    }
}
