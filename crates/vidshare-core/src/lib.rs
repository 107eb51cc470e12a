//! Vidshare Core Library
//!
//! Domain models, error types, configuration, pagination and input validation
//! shared by every vidshare crate.

pub mod config;
pub mod error;
pub mod models;
pub mod ownership;
pub mod pagination;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, MediaBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use ownership::{ensure_owner, Owned};
pub use pagination::{Page, PageRequest, SortDirection, SortField, SortSpec, VideoSortField};
pub use validation::{optional_text, parse_object_id, require_text};
