//! In-memory store - the fallback when no database is configured, and the
//! backing store for service-level tests.
//!
//! Entities live in per-type arenas keyed by id. Uniqueness rules (one like
//! per (user, post), unique normalized tag names) are checked under the
//! write lock, which makes them race-proof within a single process - the
//! same guarantee the unique indexes give the PostgreSQL store.

mod catalog;
mod interactions;
mod posts;
mod users;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Comment, Like, Post, Tag, User};

#[derive(Default)]
pub(crate) struct Arenas {
    pub posts: RwLock<HashMap<Uuid, Post>>,
    pub categories: RwLock<HashMap<Uuid, Category>>,
    pub tags: RwLock<HashMap<Uuid, Tag>>,
    pub comments: RwLock<HashMap<Uuid, Comment>>,
    pub likes: RwLock<HashMap<Uuid, Like>>,
    pub users: RwLock<HashMap<Uuid, User>>,
}

/// In-memory implementation of every repository port.
///
/// Cloning is cheap; clones share the same arenas. Data is lost on process
/// restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) arenas: Arc<Arenas>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
