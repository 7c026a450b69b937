//! Field-level validation. All checks run before any mutation is attempted,
//! so a validation failure never leaves a partial write behind.

use crate::error::DomainError;

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 255;
pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 50;
pub const COMMENT_MAX: usize = 1000;

pub fn post_title(title: &str) -> Result<(), DomainError> {
    let len = title.chars().count();
    if !(TITLE_MIN..=TITLE_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "title must be between {TITLE_MIN} and {TITLE_MAX} characters"
        )));
    }
    Ok(())
}

pub fn post_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    Ok(())
}

pub fn category_name(name: &str) -> Result<(), DomainError> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "category name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    Ok(())
}

/// Validates an already-normalized tag name: length plus the
/// alphanumeric/hyphen/space character set.
pub fn tag_name(name: &str) -> Result<(), DomainError> {
    let len = name.chars().count();
    if !(NAME_MIN..=NAME_MAX).contains(&len) {
        return Err(DomainError::Validation(format!(
            "tag name must be between {NAME_MIN} and {NAME_MAX} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == ' ')
    {
        return Err(DomainError::Validation(
            "tag name may only contain letters, digits, hyphens and spaces".to_string(),
        ));
    }
    Ok(())
}

/// Shallow shape check; deliverability is the mail system's problem.
pub fn email(address: &str) -> Result<(), DomainError> {
    let Some((local, domain)) = address.split_once('@') else {
        return Err(DomainError::Validation(
            "email must contain a single @".to_string(),
        ));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(DomainError::Validation(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

pub fn comment_content(content: &str) -> Result<(), DomainError> {
    let len = content.chars().count();
    if len == 0 || len > COMMENT_MAX {
        return Err(DomainError::Validation(format!(
            "comment must be between 1 and {COMMENT_MAX} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(post_title("ab").is_err());
        assert!(post_title("abc").is_ok());
        assert!(post_title(&"x".repeat(255)).is_ok());
        assert!(post_title(&"x".repeat(256)).is_err());
    }

    #[test]
    fn tag_name_charset() {
        assert!(tag_name("spring-boot").is_ok());
        assert!(tag_name("rust 2024").is_ok());
        assert!(tag_name("c++").is_err());
        assert!(tag_name("a").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email("reader@example.com").is_ok());
        assert!(email("no-at-sign").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("reader@").is_err());
        assert!(email("a@b@c").is_err());
    }

    #[test]
    fn comment_bounds() {
        assert!(comment_content("").is_err());
        assert!(comment_content("hi").is_ok());
        assert!(comment_content(&"x".repeat(1000)).is_ok());
        assert!(comment_content(&"x".repeat(1001)).is_err());
    }
}
