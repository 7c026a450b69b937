//! User arena.

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::User;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, UserRepository};

use super::MemoryStore;

#[async_trait]
impl BaseRepository<User, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.arenas.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        self.arenas.users.write().await.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.users.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .arenas
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.arenas.users.read().await.contains_key(&id))
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.arenas.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_by_email_matches_exactly() {
        let store = MemoryStore::new();
        let user = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        store.save(user.clone()).await.unwrap();

        let found = store.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);
        assert!(store.find_by_email("ADA@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_orders_by_creation_time() {
        let store = MemoryStore::new();
        let first = User::new("ada".into(), "ada@example.com".into(), "hash".into());
        let mut second = User::new("grace".into(), "grace@example.com".into(), "hash".into());
        second.created_at = first.created_at + chrono::Duration::seconds(1);
        store.save(second.clone()).await.unwrap();
        store.save(first.clone()).await.unwrap();

        let all = UserRepository::find_all(&store).await.unwrap();
        assert_eq!(
            all.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }
}
