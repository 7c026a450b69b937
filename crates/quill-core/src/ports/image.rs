//! Image-storage collaborator boundary.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the external image store.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image store unavailable: {0}")]
    Unavailable(String),

    #[error("image rejected: {0}")]
    Rejected(String),
}

/// External object-storage collaborator for cover images. The core only ever
/// uploads raw bytes and deletes by public id.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return a publicly addressable URL.
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageError>;

    /// Delete a previously uploaded image by its public id.
    async fn delete(&self, public_id: &str) -> Result<(), ImageError>;
}

/// Derive the store's public id from an image URL: the final path segment,
/// stripped of its extension.
pub fn public_id_from_url(url: &str) -> Option<&str> {
    let segment = url.rsplit('/').next()?;
    let id = segment.split('.').next().unwrap_or(segment);
    if id.is_empty() { None } else { Some(id) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_path_and_extension() {
        assert_eq!(
            public_id_from_url("https://img.example.com/covers/abc123.png"),
            Some("abc123")
        );
        assert_eq!(public_id_from_url("abc123.jpeg"), Some("abc123"));
        assert_eq!(public_id_from_url("plain"), Some("plain"));
        assert_eq!(public_id_from_url("https://img.example.com/covers/"), None);
    }
}
