//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - domain-level errors and query validation
//! - [`locale::Locale`] - catalog of user-facing text
//! - [`string`] - UTF-8 safe string helpers

pub mod error;
pub mod locale;
pub mod string;
