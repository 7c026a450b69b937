//! SeaORM entities mirroring the domain model. The post/tag many-to-many
//! lives in the `post_tags` junction table; `likes` carries a unique index
//! on (user_id, post_id) and `tags` on name (see the migration crate).

pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod post_tag;
pub mod tag;
pub mod user;
