//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post aggregate, the interaction ledger rules, and the ports the
//! infrastructure must implement.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod projection;
pub mod services;
pub mod validate;

pub use error::DomainError;
