//! End-to-end service flows over the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use async_trait::async_trait;
use quill_core::DomainError;
use quill_core::domain::{PostPatch, PostStatus, User, UserPatch};
use quill_core::pagination::SortField;
use quill_core::ports::{BaseRepository, ImageError, ImageStore};
use quill_core::services::{
    CategoryService, CommentService, LikeService, NewPost, PostService, TagService, UserService,
};
use quill_infra::{InMemoryImageStore, MemoryStore};

struct Fixture {
    store: Arc<MemoryStore>,
    posts: Arc<PostService>,
    comments: CommentService,
    likes: LikeService,
    tags: TagService,
    categories: CategoryService,
    users: UserService,
}

fn fixture() -> Fixture {
    fixture_with_images(Arc::new(InMemoryImageStore::new()))
}

fn fixture_with_images(images: Arc<dyn ImageStore>) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let posts = Arc::new(PostService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        images.clone(),
    ));
    let users = UserService::new(store.clone(), images);
    let comments = CommentService::new(store.clone(), store.clone(), store.clone());
    let likes = LikeService::new(store.clone(), store.clone(), store.clone());
    let tags = TagService::new(store.clone());
    let categories = CategoryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    Fixture {
        store,
        posts,
        comments,
        likes,
        tags,
        categories,
        users,
    }
}

async fn seed_user(fx: &Fixture, name: &str) -> Uuid {
    let user = User::new(name.to_string(), format!("{name}@example.com"), "hash".into());
    let saved = BaseRepository::<User, Uuid>::save(fx.store.as_ref(), user)
        .await
        .unwrap();
    saved.id
}

async fn seed_post(fx: &Fixture, author: Uuid, title: &str) -> Uuid {
    let category = fx
        .categories
        .create_category("Tech".into(), None)
        .await
        .unwrap();
    let detail = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: title.to_string(),
                content: "A post about things.".to_string(),
                category_id: category.id,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap();
    detail.id
}

#[tokio::test]
async fn created_post_starts_as_unread_draft() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let category = fx
        .categories
        .create_category("Tech".into(), None)
        .await
        .unwrap();

    let detail = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "First post".into(),
                content: "Hello world.".into(),
                category_id: category.id,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap();

    assert_eq!(detail.status, PostStatus::Draft);
    assert_eq!(detail.views, 0);
    assert_eq!(detail.created_at, detail.updated_at);
    assert_eq!(detail.category.name, "Tech");
}

#[tokio::test]
async fn title_only_patch_leaves_everything_else() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let tag = fx.tags.create_tag("rust").await.unwrap();
    let category = fx
        .categories
        .create_category("Tech".into(), None)
        .await
        .unwrap();
    let created = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "Original title".into(),
                content: "Original content.".into(),
                category_id: category.id,
                tag_ids: vec![tag.id],
            },
        )
        .await
        .unwrap();

    let updated = fx
        .posts
        .update_post(
            created.id,
            PostPatch {
                title: Some("New title".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "New title");
    assert_eq!(updated.content, "Original content.");
    assert_eq!(updated.category.id, category.id);
    assert!(updated.tags.contains("rust"));
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn empty_tag_list_clears_tags_but_absent_list_keeps_them() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let tag = fx.tags.create_tag("rust").await.unwrap();
    let category = fx
        .categories
        .create_category("Tech".into(), None)
        .await
        .unwrap();
    let created = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "Tagged post".into(),
                content: "Body.".into(),
                category_id: category.id,
                tag_ids: vec![tag.id],
            },
        )
        .await
        .unwrap();

    let untouched = fx
        .posts
        .update_post(
            created.id,
            PostPatch {
                content: Some("New body.".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(untouched.tags.contains("rust"));

    let cleared = fx
        .posts
        .update_post(
            created.id,
            PostPatch {
                tag_ids: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.tags.is_empty());
}

#[tokio::test]
async fn concurrent_reads_count_every_view() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let post_id = seed_post(&fx, author, "Popular post").await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let posts = fx.posts.clone();
        handles.push(tokio::spawn(async move { posts.get_post(post_id).await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // One more read observes all prior increments plus its own.
    let detail = fx.posts.get_post(post_id).await.unwrap();
    assert_eq!(detail.views, 21);
}

#[tokio::test]
async fn like_toggle_alternates_and_counts_stay_fresh() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let reader = seed_user(&fx, "bob").await;
    let post_id = seed_post(&fx, author, "Likable post").await;

    let liked = fx.likes.toggle_like(reader, post_id).await.unwrap();
    assert!(liked.has_user_liked);
    assert_eq!(liked.like_count, 1);
    assert_eq!(liked.message, "Post liked successfully");

    let unliked = fx.likes.toggle_like(reader, post_id).await.unwrap();
    assert!(!unliked.has_user_liked);
    assert_eq!(unliked.like_count, 0);
    assert_eq!(unliked.message, "Post unliked successfully");

    let again = fx.likes.toggle_like(reader, post_id).await.unwrap();
    assert!(again.has_user_liked);
    assert_eq!(again.like_count, 1);

    let info = fx.likes.like_info(reader, post_id).await.unwrap();
    assert!(info.has_user_liked);
    assert_eq!(info.like_count, 1);
}

#[tokio::test]
async fn deleting_a_post_removes_its_interactions() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let reader = seed_user(&fx, "bob").await;
    let post_id = seed_post(&fx, author, "Doomed post").await;

    fx.comments
        .create_comment(reader, post_id, "Nice one".into())
        .await
        .unwrap();
    fx.likes.toggle_like(reader, post_id).await.unwrap();

    fx.posts.delete_post(post_id).await.unwrap();

    assert!(matches!(
        fx.posts.get_post(post_id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(fx.comments.list_by_post(post_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn tag_names_normalize_and_collide() {
    let fx = fixture();

    let tag = fx.tags.create_tag("  Spring-Boot ").await.unwrap();
    assert_eq!(tag.name, "spring-boot");

    assert!(matches!(
        fx.tags.create_tag("spring-boot").await,
        Err(DomainError::AlreadyExists(_))
    ));
}

#[tokio::test]
async fn published_listing_contains_only_published_posts() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let category = fx
        .categories
        .create_category("Tech".into(), None)
        .await
        .unwrap();

    let draft = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "Still a draft".into(),
                content: "wip".into(),
                category_id: category.id,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap();
    let published = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "Shipped".into(),
                content: "done".into(),
                category_id: category.id,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap();
    fx.posts
        .update_status(published.id, PostStatus::Published)
        .await
        .unwrap();

    let page = fx
        .posts
        .list_published(0, 10, SortField::CreatedAt)
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, published.id);
    assert!(page.items.iter().all(|p| p.id != draft.id));
}

#[tokio::test]
async fn category_delete_cascades_to_posts() {
    let fx = fixture();
    let author = seed_user(&fx, "ada").await;
    let reader = seed_user(&fx, "bob").await;
    let category = fx
        .categories
        .create_category("Doomed".into(), None)
        .await
        .unwrap();
    let detail = fx
        .posts
        .create_post(
            author,
            NewPost {
                title: "In a doomed category".into(),
                content: "Body.".into(),
                category_id: category.id,
                tag_ids: vec![],
            },
        )
        .await
        .unwrap();
    fx.comments
        .create_comment(reader, detail.id, "so long".into())
        .await
        .unwrap();

    fx.categories.delete_category(category.id).await.unwrap();

    assert!(matches!(
        fx.categories.get_category(category.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        fx.posts.get_post(detail.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(fx.comments.list_by_post(detail.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_patch_leaves_absent_fields_alone() {
    let fx = fixture();
    let ada = seed_user(&fx, "ada").await;

    let named = fx
        .users
        .edit_profile(
            ada,
            UserPatch {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(named.first_name.as_deref(), Some("Ada"));
    assert_eq!(named.email, "ada@example.com");

    let rerouted = fx
        .users
        .edit_profile(
            ada,
            UserPatch {
                email: Some("countess@example.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(rerouted.email, "countess@example.com");
    assert_eq!(rerouted.first_name.as_deref(), Some("Ada"));
    assert_eq!(rerouted.last_name.as_deref(), Some("Lovelace"));
    assert!(rerouted.updated_at > named.updated_at);
}

#[tokio::test]
async fn malformed_email_patch_is_rejected_before_any_write() {
    let fx = fixture();
    let ada = seed_user(&fx, "ada").await;

    let err = fx
        .users
        .edit_profile(
            ada,
            UserPatch {
                email: Some("not-an-address".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let unchanged = fx.users.get_user(ada).await.unwrap();
    assert_eq!(unchanged.email, "ada@example.com");
}

#[tokio::test]
async fn profile_picture_upload_moves_the_reference_and_keeps_old_bytes() {
    let images = Arc::new(InMemoryImageStore::new());
    let fx = fixture_with_images(images.clone());
    let ada = seed_user(&fx, "ada").await;

    let first = fx
        .users
        .update_profile_picture(ada, vec![1, 2, 3], "ada.png")
        .await
        .unwrap();
    let first_url = first.profile_picture_url.clone().unwrap();
    let first_id = quill_core::ports::public_id_from_url(&first_url)
        .unwrap()
        .to_string();
    assert!(images.contains(&first_id).await);

    let second = fx
        .users
        .update_profile_picture(ada, vec![4, 5, 6], "ada2.png")
        .await
        .unwrap();
    let second_url = second.profile_picture_url.unwrap();
    assert_ne!(second_url, first_url);

    // Only the reference moves; the replaced picture stays in the store.
    assert!(images.contains(&first_id).await);
}

#[tokio::test]
async fn unavailable_image_store_fails_the_picture_update() {
    let fx = fixture_with_images(Arc::new(FailingImageStore));
    let ada = seed_user(&fx, "ada").await;

    let err = fx
        .users
        .update_profile_picture(ada, vec![1, 2, 3], "ada.png")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Dependency(_)));

    let unchanged = fx.users.get_user(ada).await.unwrap();
    assert!(unchanged.profile_picture_url.is_none());
}

#[tokio::test]
async fn user_listing_covers_every_account() {
    let fx = fixture();
    let ada = seed_user(&fx, "ada").await;
    let bob = seed_user(&fx, "bob").await;

    let all = fx.users.list_users().await.unwrap();
    let ids: Vec<Uuid> = all.iter().map(|u| u.id).collect();
    assert_eq!(all.len(), 2);
    assert!(ids.contains(&ada));
    assert!(ids.contains(&bob));
}

struct FailingImageStore;

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn upload(&self, _bytes: Vec<u8>, _filename: &str) -> Result<String, ImageError> {
        Err(ImageError::Unavailable("storage offline".into()))
    }

    async fn delete(&self, _public_id: &str) -> Result<(), ImageError> {
        Err(ImageError::Unavailable("storage offline".into()))
    }
}

#[tokio::test]
async fn image_store_failure_aborts_post_deletion() {
    let fx = fixture_with_images(Arc::new(FailingImageStore));
    let author = seed_user(&fx, "ada").await;
    let post_id = seed_post(&fx, author, "Post with cover").await;

    // The post has no cover yet, so the store is never consulted here.
    fx.posts
        .update_image(post_id, "memory://images/abc123.png".into())
        .await
        .unwrap();

    let err = fx.posts.delete_post(post_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Dependency(_)));

    // The cascade never ran; the post is still readable.
    assert!(fx.posts.get_post(post_id).await.is_ok());
}
