//! PostgreSQL repository implementations.
//!
//! Saves are insert-on-conflict-update so a domain entity with a
//! client-generated id can be persisted without knowing whether it is new.
//! Unique-index violations surface as `RepoError::Constraint`.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DbConn, DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    Select, Set, SqlErr,
};
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Like, Post, PostStatus, Tag, User};
use quill_core::error::RepoError;
use quill_core::pagination::{Page, PageRequest, SortDirection, SortField};
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LikeRepository, PostRepository,
    TagRepository, UserRepository,
};

use super::entity::{category, comment, like, post, post_tag, tag, user};

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

pub(crate) fn constraint_or_query(e: DbErr) -> RepoError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::Constraint(msg),
        _ => RepoError::Query(e.to_string()),
    }
}

/// PostgreSQL post repository.
pub struct PgPostRepository {
    db: DbConn,
}

impl PgPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn tag_ids_for(&self, post_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let rows = post_tag::Entity::find()
            .filter(post_tag::Column::PostId.eq(post_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(rows.into_iter().map(|r| r.tag_id).collect())
    }

    async fn into_domain(&self, model: post::Model) -> Result<Post, RepoError> {
        let tag_ids = self.tag_ids_for(model.id).await?;
        model.into_domain(tag_ids)
    }

    async fn fetch_page(
        &self,
        query: Select<post::Entity>,
        req: &PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        let column = match req.sort {
            SortField::CreatedAt => post::Column::CreatedAt,
            SortField::Title => post::Column::Title,
            SortField::Views => post::Column::Views,
        };
        let order = match req.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };

        let paginator = query.order_by(column, order).paginate(&self.db, req.size);
        let totals = paginator.num_items_and_pages().await.map_err(query_err)?;
        let models = paginator.fetch_page(req.page).await.map_err(query_err)?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(self.into_domain(model).await?);
        }
        Ok(Page {
            items,
            page: req.page,
            size: req.size,
            total_items: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    async fn all_to_domain(&self, models: Vec<post::Model>) -> Result<Vec<Post>, RepoError> {
        let mut posts = Vec::with_capacity(models.len());
        for model in models {
            posts.push(self.into_domain(model).await?);
        }
        Ok(posts)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for PgPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let Some(model) = post::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };
        Ok(Some(self.into_domain(model).await?))
    }

    async fn save(&self, entity: Post) -> Result<Post, RepoError> {
        let tag_ids = entity.tag_ids.clone();
        let active: post::ActiveModel = entity.into();

        let model = post::Entity::insert(active)
            .on_conflict(
                OnConflict::column(post::Column::Id)
                    .update_columns([
                        post::Column::AuthorId,
                        post::Column::CategoryId,
                        post::Column::Title,
                        post::Column::Content,
                        post::Column::CoverImageUrl,
                        post::Column::Status,
                        post::Column::Views,
                        post::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query)?;

        // Replace the junction rows wholesale; the tag set is small.
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::PostId.eq(model.id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if !tag_ids.is_empty() {
            let rows = tag_ids.iter().map(|tag_id| post_tag::ActiveModel {
                post_id: Set(model.id),
                tag_id: Set(*tag_id),
            });
            post_tag::Entity::insert_many(rows)
                .exec(&self.db)
                .await
                .map_err(constraint_or_query)?;
        }

        model.into_domain(tag_ids)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = post::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn find_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError> {
        self.fetch_page(post::Entity::find(), req).await
    }

    async fn find_published_page(&self, req: &PageRequest) -> Result<Page<Post>, RepoError> {
        let query = post::Entity::find()
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()));
        self.fetch_page(query, req).await
    }

    async fn find_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let models = post::Entity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        self.all_to_domain(models).await
    }

    async fn find_published_by_category(&self, category_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let models = post::Entity::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .order_by(post::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        self.all_to_domain(models).await
    }

    async fn find_published_by_tag(&self, tag_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let post_ids: Vec<Uuid> = post_tag::Entity::find()
            .filter(post_tag::Column::TagId.eq(tag_id))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|r| r.post_id)
            .collect();
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = post::Entity::find()
            .filter(post::Column::Id.is_in(post_ids))
            .filter(post::Column::Status.eq(PostStatus::Published.as_str()))
            .order_by(post::Column::CreatedAt, Order::Desc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        self.all_to_domain(models).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), RepoError> {
        // Relative update ("views = views + 1") so concurrent readers
        // cannot lose increments.
        let result = post::Entity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// PostgreSQL category repository.
pub struct PgCategoryRepository {
    db: DbConn,
}

impl PgCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for PgCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let model = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, entity: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = entity.into();
        let model = category::Entity::insert(active)
            .on_conflict(
                OnConflict::column(category::Column::Id)
                    .update_columns([category::Column::Name, category::Column::Description])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let count = category::Entity::find()
            .filter(category::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(query_err)?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> Result<Vec<Category>, RepoError> {
        let models = category::Entity::find()
            .order_by(category::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL tag repository.
pub struct PgTagRepository {
    db: DbConn,
}

impl PgTagRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for PgTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        let model = tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        let active: tag::ActiveModel = entity.into();
        let model = tag::Entity::insert(active)
            .on_conflict(
                OnConflict::column(tag::Column::Id)
                    .update_columns([tag::Column::Name])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = tag::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for PgTagRepository {
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let model = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let count = tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(query_err)?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> Result<Vec<Tag>, RepoError> {
        let models = tag::Entity::find()
            .order_by(tag::Column::Name, Order::Asc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn detach_from_posts(&self, tag_id: Uuid) -> Result<(), RepoError> {
        post_tag::Entity::delete_many()
            .filter(post_tag::Column::TagId.eq(tag_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }
}

/// PostgreSQL comment repository.
pub struct PgCommentRepository {
    db: DbConn,
}

impl PgCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for PgCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let model = comment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, entity: Comment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = entity.into();
        let model = comment::Entity::insert(active)
            .on_conflict(
                OnConflict::column(comment::Column::Id)
                    .update_columns([comment::Column::Content, comment::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = comment::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let models = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by(comment::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let result = comment::Entity::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected)
    }
}

/// PostgreSQL like repository.
pub struct PgLikeRepository {
    db: DbConn,
}

impl PgLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<Like, Uuid> for PgLikeRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Like>, RepoError> {
        let model = like::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    // Likes are never updated in place; a duplicate (user_id, post_id)
    // insert trips the unique index and comes back as Constraint.
    async fn save(&self, entity: Like) -> Result<Like, RepoError> {
        let active: like::ActiveModel = entity.clone().into();
        like::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(constraint_or_query)?;
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = like::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn find_by_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<Option<Like>, RepoError> {
        let model = like::Entity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn exists_by_user_and_post(
        &self,
        user_id: Uuid,
        post_id: Uuid,
    ) -> Result<bool, RepoError> {
        let count = like::Entity::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)?;
        Ok(count > 0)
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        like::Entity::find()
            .filter(like::Column::PostId.eq(post_id))
            .count(&self.db)
            .await
            .map_err(query_err)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let result = like::Entity::delete_many()
            .filter(like::Column::PostId.eq(post_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.rows_affected)
    }
}

/// PostgreSQL user repository.
pub struct PgUserRepository {
    db: DbConn,
}

impl PgUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = entity.into();
        let model = user::Entity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::Username,
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::FirstName,
                        user::Column::LastName,
                        user::Column::ProfilePictureUrl,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(constraint_or_query)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(model.map(Into::into))
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        let count = user::Entity::find()
            .filter(user::Column::Id.eq(id))
            .count(&self.db)
            .await
            .map_err(query_err)?;
        Ok(count > 0)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepoError> {
        let models = user::Entity::find()
            .order_by(user::Column::CreatedAt, Order::Asc)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
