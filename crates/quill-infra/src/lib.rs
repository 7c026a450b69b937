//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the in-memory store, the PostgreSQL store, the image
//! store, and the authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL support via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;
pub mod images;
pub mod memory;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use images::InMemoryImageStore;
pub use memory::MemoryStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

// Re-exports - Postgres
pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{
    PgCategoryRepository, PgCommentRepository, PgLikeRepository, PgPostRepository,
    PgTagRepository, PgUserRepository, connect,
};
