//! PostgreSQL persistence (behind the `postgres` feature).

mod connections;

#[cfg(feature = "postgres")]
pub mod entity;

#[cfg(feature = "postgres")]
mod repo;

pub use connections::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use connections::connect;

#[cfg(feature = "postgres")]
pub use repo::{
    PgCategoryRepository, PgCommentRepository, PgLikeRepository, PgPostRepository,
    PgTagRepository, PgUserRepository,
};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
