//! Pagination and sorting for post listings.
//!
//! Sort field and direction parse fail-fast: an unknown value is a
//! validation error, never a silent default.

use std::str::FromStr;

use serde::Serialize;

use crate::error::DomainError;

/// Hard cap on caller-controlled page sizes.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Sortable post fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Title,
    Views,
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created_at" => Ok(SortField::CreatedAt),
            "title" => Ok(SortField::Title),
            "views" => Ok(SortField::Views),
            other => Err(DomainError::Validation(format!(
                "unknown sort field: {other}"
            ))),
        }
    }
}

/// Sort direction, case-insensitive on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(DomainError::Validation(format!(
                "unknown sort direction: {other}"
            ))),
        }
    }
}

/// A zero-based page request. Size is clamped to [`MAX_PAGE_SIZE`]; zero is
/// rejected.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl PageRequest {
    pub fn new(
        page: u64,
        size: u64,
        sort: SortField,
        direction: SortDirection,
    ) -> Result<Self, DomainError> {
        if size == 0 {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort,
            direction,
        })
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn from_items(items: Vec<T>, page: u64, size: u64, total_items: u64) -> Self {
        Self {
            items,
            page,
            size,
            total_items,
            total_pages: total_items.div_ceil(size.max(1)),
        }
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.total_pages || self.total_pages == 0
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_field_rejects_unknown_values() {
        assert!("createdAt".parse::<SortField>().is_ok());
        assert!("views".parse::<SortField>().is_ok());
        assert!("likes".parse::<SortField>().is_err());
    }

    #[test]
    fn direction_is_case_insensitive() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("Asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("down".parse::<SortDirection>().is_err());
    }

    #[test]
    fn page_size_is_clamped_and_zero_rejected() {
        let req = PageRequest::new(0, 10_000, SortField::CreatedAt, SortDirection::Desc).unwrap();
        assert_eq!(req.size, MAX_PAGE_SIZE);
        assert!(PageRequest::new(0, 0, SortField::CreatedAt, SortDirection::Desc).is_err());
    }

    #[test]
    fn page_totals() {
        let page = Page::from_items(vec![1, 2, 3], 0, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(!page.is_last());
        let last = Page::from_items(vec![7], 2, 3, 7);
        assert!(last.is_last());
    }
}
