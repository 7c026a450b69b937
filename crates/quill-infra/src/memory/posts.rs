//! Post arena queries: CRUD, sorted pagination, published filters, and the
//! atomic view increment.

use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Post, PostStatus};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest, SortDirection, SortField};
use quill_core::ports::{BaseRepository, PostRepository};

use super::MemoryStore;

fn sort_posts(posts: &mut [Post], sort: SortField, direction: SortDirection) {
    posts.sort_by(|a, b| {
        let ord = match sort {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Views => a.views.cmp(&b.views),
        };
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn paginate(mut posts: Vec<Post>, req: &PageRequest) -> Page<Post> {
    sort_posts(&mut posts, req.sort, req.direction);
    let total = posts.len() as u64;
    // page is caller-controlled; an offset past u64::MAX must clamp, not
    // overflow. A page beyond the data simply comes back empty.
    let offset = req
        .page
        .checked_mul(req.size)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
        .unwrap_or(usize::MAX);
    let items = posts
        .into_iter()
        .skip(offset)
        .take(req.size as usize)
        .collect();
    Page::from_items(items, req.page, req.size, total)
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.arenas.posts.read().await.get(&id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        self.arenas.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.arenas.posts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError> {
        let posts: Vec<Post> = self.arenas.posts.read().await.values().cloned().collect();
        Ok(paginate(posts, req))
    }

    async fn find_published_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError> {
        let posts: Vec<Post> = self
            .arenas
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.status == PostStatus::Published)
            .cloned()
            .collect();
        Ok(paginate(posts, req))
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .arenas
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_published_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .arenas
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.category_id == category_id && p.status == PostStatus::Published)
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn find_published_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let posts = self
            .arenas
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.status == PostStatus::Published && p.tag_ids.contains(&tag_id))
            .cloned()
            .collect();
        Ok(newest_first(posts))
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        // Relative update under the write lock: no reader can interleave
        // between the load and the store.
        match self.arenas.posts.write().await.get_mut(&id) {
            Some(post) => {
                post.views += 1;
                Ok(())
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, views: u64, status: PostStatus) -> Post {
        let mut p = Post::new(
            Uuid::new_v4(),
            title.to_string(),
            "content".to_string(),
            Uuid::new_v4(),
            vec![],
        );
        p.views = views;
        p.status = status;
        p
    }

    #[tokio::test]
    async fn pages_are_sorted_and_sliced() {
        let store = MemoryStore::new();
        for (title, views) in [("alpha", 3), ("beta", 1), ("gamma", 2)] {
            store.save(post(title, views, PostStatus::Draft)).await.unwrap();
        }

        let req = PageRequest::new(0, 2, SortField::Views, SortDirection::Desc).unwrap();
        let page = store.find_page(&req).await.unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].title, "alpha");
        assert_eq!(page.items[1].title, "gamma");

        let req = PageRequest::new(1, 2, SortField::Views, SortDirection::Desc).unwrap();
        let page = store.find_page(&req).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "beta");
    }

    #[tokio::test]
    async fn absurd_page_number_yields_an_empty_page() {
        let store = MemoryStore::new();
        store.save(post("only", 0, PostStatus::Draft)).await.unwrap();

        let req = PageRequest::new(u64::MAX, 100, SortField::CreatedAt, SortDirection::Desc)
            .unwrap();
        let page = store.find_page(&req).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
    }

    #[tokio::test]
    async fn published_page_filters_drafts() {
        let store = MemoryStore::new();
        store.save(post("draft", 0, PostStatus::Draft)).await.unwrap();
        store.save(post("live", 0, PostStatus::Published)).await.unwrap();

        let req = PageRequest::new(0, 10, SortField::CreatedAt, SortDirection::Desc).unwrap();
        let page = store.find_published_page(&req).await.unwrap();
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].title, "live");
    }

    #[tokio::test]
    async fn increment_views_missing_post_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.increment_views(Uuid::new_v4()).await,
            Err(RepoError::NotFound)
        ));
    }
}
