//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, CommentRepository, ImageStore, LikeRepository, PostRepository,
    TagRepository, UserRepository,
};
use quill_core::services::{
    CategoryService, CommentService, LikeService, PostService, TagService, UserService,
};
use quill_infra::{DatabaseConfig, InMemoryImageStore, MemoryStore};

#[cfg(feature = "postgres")]
use quill_infra::{
    PgCategoryRepository, PgCommentRepository, PgLikeRepository, PgPostRepository,
    PgTagRepository, PgUserRepository, connect,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub likes: Arc<LikeService>,
    pub tags: Arc<TagService>,
    pub categories: Arc<CategoryService>,
    pub profiles: Arc<UserService>,
    pub users: Arc<dyn UserRepository>,
}

struct Repos {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    likes: Arc<dyn LikeRepository>,
    users: Arc<dyn UserRepository>,
}

impl Repos {
    fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            posts: store.clone(),
            categories: store.clone(),
            tags: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            users: store,
        }
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match db_config {
            Some(config) => match connect(config).await {
                Ok(db) => Repos {
                    posts: Arc::new(PgPostRepository::new(db.clone())),
                    categories: Arc::new(PgCategoryRepository::new(db.clone())),
                    tags: Arc::new(PgTagRepository::new(db.clone())),
                    comments: Arc::new(PgCommentRepository::new(db.clone())),
                    likes: Arc::new(PgLikeRepository::new(db.clone())),
                    users: Arc::new(PgUserRepository::new(db)),
                },
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Repos::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repos::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Repos::in_memory()
        };

        let images: Arc<dyn ImageStore> = Arc::new(InMemoryImageStore::new());

        let posts = Arc::new(PostService::new(
            repos.posts.clone(),
            repos.categories.clone(),
            repos.tags.clone(),
            repos.comments.clone(),
            repos.likes.clone(),
            repos.users.clone(),
            images.clone(),
        ));
        let profiles = Arc::new(UserService::new(repos.users.clone(), images));
        let comments = Arc::new(CommentService::new(
            repos.comments.clone(),
            repos.posts.clone(),
            repos.users.clone(),
        ));
        let likes = Arc::new(LikeService::new(
            repos.likes.clone(),
            repos.posts.clone(),
            repos.users.clone(),
        ));
        let tags = Arc::new(TagService::new(repos.tags.clone()));
        let categories = Arc::new(CategoryService::new(
            repos.categories,
            repos.posts,
            repos.comments,
            repos.likes,
        ));

        tracing::info!("Application state initialized");

        Self {
            posts,
            comments,
            likes,
            tags,
            categories,
            profiles,
            users: repos.users,
        }
    }
}
