//! Repository tests against a mocked database backend.

use chrono::Utc;
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, RuntimeErr};
use uuid::Uuid;

use quill_core::domain::PostStatus;
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, TagRepository};

use super::entity::{post, post_tag, tag};
use super::repo::{PgPostRepository, PgTagRepository, constraint_or_query};

fn post_model(id: Uuid) -> post::Model {
    let now = Utc::now().into();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        category_id: Uuid::new_v4(),
        title: "Testing with a mock backend".to_string(),
        content: "body".to_string(),
        cover_image_url: None,
        status: PostStatus::Draft.as_str().to_string(),
        views: 3,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn find_by_id_loads_post_and_tag_ids() {
    let id = Uuid::new_v4();
    let tag_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(id)]])
        .append_query_results([vec![post_tag::Model {
            post_id: id,
            tag_id,
        }]])
        .into_connection();

    let repo = PgPostRepository::new(db);
    let found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.views, 3);
    assert_eq!(found.tag_ids, vec![tag_id]);
}

#[tokio::test]
async fn find_by_id_missing_is_none() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PgPostRepository::new(db);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn increment_views_requires_a_matching_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PgPostRepository::new(db);
    repo.increment_views(Uuid::new_v4()).await.unwrap();
    let err = repo.increment_views(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound));
}

#[test]
fn only_sql_unique_violations_become_constraint_errors() {
    // Error text mentioning "unique" is not a unique violation; the
    // classification must come from the driver, not the message.
    let err = DbErr::Query(RuntimeErr::Internal(
        "could not acquire unique advisory lock".to_string(),
    ));
    assert!(matches!(constraint_or_query(err), RepoError::Query(_)));
}

#[tokio::test]
async fn tag_lookup_by_name() {
    let id = Uuid::new_v4();
    let now = Utc::now().into();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag::Model {
            id,
            name: "rust".to_string(),
            created_at: now,
        }]])
        .into_connection();

    let repo = PgTagRepository::new(db);
    let found = repo.find_by_name("rust").await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "rust");
}
