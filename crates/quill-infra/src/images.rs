//! In-memory image store - backs tests and database-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::ports::{ImageError, ImageStore};

/// Keeps uploaded bytes in a map keyed by public id. URLs have the shape
/// `memory://images/<public_id>.<ext>` so the public-id derivation used by
/// the lifecycle service round-trips.
#[derive(Default)]
pub struct InMemoryImageStore {
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, public_id: &str) -> bool {
        self.store.read().await.contains_key(public_id)
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Rejected("empty image payload".to_string()));
        }
        let ext = filename.rsplit('.').next().filter(|e| *e != filename).unwrap_or("bin");
        let public_id = Uuid::new_v4().simple().to_string();

        self.store.write().await.insert(public_id.clone(), bytes);
        Ok(format!("memory://images/{public_id}.{ext}"))
    }

    async fn delete(&self, public_id: &str) -> Result<(), ImageError> {
        // Deleting an id we never stored is fine: the contract is only that
        // the image is gone afterwards.
        self.store.write().await.remove(public_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::ports::public_id_from_url;

    #[tokio::test]
    async fn upload_url_round_trips_through_public_id() {
        let store = InMemoryImageStore::new();
        let url = store.upload(vec![1, 2, 3], "cover.png").await.unwrap();

        let public_id = public_id_from_url(&url).unwrap();
        assert!(store.contains(public_id).await);

        store.delete(public_id).await.unwrap();
        assert!(!store.contains(public_id).await);
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let store = InMemoryImageStore::new();
        assert!(matches!(
            store.upload(vec![], "cover.png").await,
            Err(ImageError::Rejected(_))
        ));
    }
}
