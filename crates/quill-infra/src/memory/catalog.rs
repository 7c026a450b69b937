//! Category and tag arenas. Tag-name uniqueness is enforced on save, under
//! the write lock, mirroring the unique index of the PostgreSQL store.

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Category, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, TagRepository};

use super::MemoryStore;

#[async_trait]
impl BaseRepository<Category, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.arenas.categories.read().await.get(&id).cloned())
    }

    async fn save(&self, category: Category) -> Result<Category, RepoError> {
        self.arenas
            .categories
            .write()
            .await
            .insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.categories.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.arenas.categories.read().await.contains_key(&id))
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut all: Vec<Category> = self.arenas.categories.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.arenas.tags.read().await.get(&id).cloned())
    }

    async fn save(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tags = self.arenas.tags.write().await;
        let duplicate = tags
            .values()
            .any(|t| t.name == tag.name && t.id != tag.id);
        if duplicate {
            return Err(RepoError::Constraint(format!(
                "duplicate tag name: {}",
                tag.name
            )));
        }
        tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.tags.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl TagRepository for MemoryStore {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        let tags = self.arenas.tags.read().await;
        Ok(ids.iter().filter_map(|id| tags.get(id).cloned()).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        Ok(self
            .arenas
            .tags
            .read()
            .await
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        Ok(self.arenas.tags.read().await.values().any(|t| t.name == name))
    }

    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let mut all: Vec<Tag> = self.arenas.tags.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn detach_from_posts(&self, tag_id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.arenas.posts.write().await;
        for post in posts.values_mut() {
            post.tag_ids.retain(|id| *id != tag_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_tag_name_hits_the_constraint() {
        let store = MemoryStore::new();
        store.save(Tag::new("rust".into())).await.unwrap();

        let result = store.save(Tag::new("rust".into())).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn saving_the_same_tag_again_is_an_update_not_a_conflict() {
        let store = MemoryStore::new();
        let tag = store.save(Tag::new("rust".into())).await.unwrap();
        assert!(store.save(tag).await.is_ok());
    }

    #[tokio::test]
    async fn find_by_ids_skips_unknown() {
        let store = MemoryStore::new();
        let tag = store.save(Tag::new("rust".into())).await.unwrap();

        let found = store.find_by_ids(&[tag.id, Uuid::new_v4()]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, tag.id);
    }
}
