use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag entity. Names are stored normalized (lower-cased, trimmed) and are
/// unique; the uniqueness is backed by a storage-level constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a tag with an already-normalized name.
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }

    /// Normalize a raw tag name: trim surrounding whitespace, lower-case.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(Tag::normalize("  Spring-Boot "), "spring-boot");
        assert_eq!(Tag::normalize("rust"), "rust");
    }
}
