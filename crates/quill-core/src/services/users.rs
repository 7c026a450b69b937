//! User profile management: partial profile edits, profile picture
//! replacement through the image store, and the account listing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, UserPatch};
use crate::error::DomainError;
use crate::ports::{ImageError, ImageStore, UserRepository};
use crate::validate;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    images: Arc<dyn ImageStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, images: Arc<dyn ImageStore>) -> Self {
        Self { users, images }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    /// Apply a partial profile edit. Absent fields keep their current value;
    /// an email change is validated before any write.
    pub async fn edit_profile(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        if let Some(email) = &patch.email {
            validate::email(email)?;
        }

        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if let Some(first_name) = patch.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        user.touch();

        tracing::debug!(user_id = %id, "Updating user profile");
        let saved = self.users.save(user).await?;
        Ok(saved)
    }

    /// Upload a new profile picture and point the profile at it. The
    /// previous picture stays in the store; only the reference moves.
    pub async fn update_profile_picture(
        &self,
        id: Uuid,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let url = self.images.upload(bytes, filename).await.map_err(|e| {
            tracing::error!(user_id = %id, error = %e, "Profile picture upload failed");
            match e {
                ImageError::Rejected(msg) => DomainError::Validation(msg),
                ImageError::Unavailable(msg) => DomainError::Dependency(msg),
            }
        })?;

        user.profile_picture_url = Some(url);
        user.touch();

        let saved = self.users.save(user).await?;
        Ok(saved)
    }

    /// Every account, unpaginated.
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.find_all().await?)
    }
}
