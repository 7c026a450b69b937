//! Domain entities.
//!
//! The entity graph is flattened: entities reference each other by id only
//! (no live back-reference collections). "List children by parent id" is a
//! repository query, not an object traversal.

mod category;
mod comment;
mod like;
mod post;
mod tag;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use like::Like;
pub use post::{Post, PostPatch, PostStatus};
pub use tag::Tag;
pub use user::{User, UserPatch};
