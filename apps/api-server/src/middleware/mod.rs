//! Custom middleware and extractors.

pub mod auth;
pub mod error;
