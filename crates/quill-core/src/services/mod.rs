//! Application services orchestrating the repositories and collaborators.
//! Writes flow one way (service -> repositories/image store); reads fan out
//! through the projections.

mod categories;
mod comments;
mod likes;
mod posts;
mod tags;
mod users;

pub use categories::CategoryService;
pub use comments::CommentService;
pub use likes::{LikeService, LikeStatus};
pub use posts::{NewPost, PostService, TagAttachPolicy, parse_sort};
pub use tags::TagService;
pub use users::UserService;
