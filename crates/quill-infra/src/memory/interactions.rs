//! Comment and like arenas. The (user_id, post_id) uniqueness check for
//! likes runs under the write lock so two racing inserts cannot both win.

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Comment, Like};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CommentRepository, LikeRepository};

use super::MemoryStore;

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.arenas.comments.read().await.get(&id).cloned())
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.arenas
            .comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.comments.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .arenas
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .arenas
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut comments = self.arenas.comments.write().await;
        let before = comments.len();
        comments.retain(|_, c| c.post_id != post_id);
        Ok((before - comments.len()) as u64)
    }
}

#[async_trait]
impl BaseRepository<Like, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Like>, RepoError> {
        Ok(self.arenas.likes.read().await.get(&id).cloned())
    }

    async fn save(&self, like: Like) -> Result<Like, RepoError> {
        let mut likes = self.arenas.likes.write().await;
        let duplicate = likes
            .values()
            .any(|l| l.user_id == like.user_id && l.post_id == like.post_id && l.id != like.id);
        if duplicate {
            return Err(RepoError::Constraint(format!(
                "duplicate like for user {} on post {}",
                like.user_id, like.post_id
            )));
        }
        likes.insert(like.id, like.clone());
        Ok(like)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.likes.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn find_by_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Like>, RepoError> {
        Ok(self
            .arenas
            .likes
            .read()
            .await
            .values()
            .find(|l| l.user_id == user_id && l.post_id == post_id)
            .cloned())
    }

    async fn exists_by_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, RepoError> {
        Ok(self
            .arenas
            .likes
            .read()
            .await
            .values()
            .any(|l| l.user_id == user_id && l.post_id == post_id))
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .arenas
            .likes
            .read()
            .await
            .values()
            .filter(|l| l.post_id == post_id)
            .count() as u64)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut likes = self.arenas.likes.write().await;
        let before = likes.len();
        likes.retain(|_, l| l.post_id != post_id);
        Ok((before - likes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_like_for_same_pair_is_a_constraint_violation() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let post = Uuid::new_v4();

        store.save(Like::new(user, post)).await.unwrap();
        let result = store.save(Like::new(user, post)).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));

        // A different user liking the same post is fine.
        assert!(store.save(Like::new(Uuid::new_v4(), post)).await.is_ok());
    }

    #[tokio::test]
    async fn delete_by_post_reports_removed_rows() {
        let store = MemoryStore::new();
        let post = Uuid::new_v4();
        store.save(Like::new(Uuid::new_v4(), post)).await.unwrap();
        store.save(Like::new(Uuid::new_v4(), post)).await.unwrap();
        store.save(Like::new(Uuid::new_v4(), Uuid::new_v4())).await.unwrap();

        let removed = LikeRepository::delete_by_post(&store, post).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(LikeRepository::count_by_post(&store, post).await.unwrap(), 0);
    }
}
