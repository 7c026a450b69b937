//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod image;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use image::{ImageError, ImageStore, public_id_from_url};
pub use repository::{
    BaseRepository, CategoryRepository, CommentRepository, LikeRepository, PostRepository,
    TagRepository, UserRepository,
};
