//! Vidshare API Library
//!
//! HTTP handlers, response envelope, authentication and application setup.

mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
mod handlers;
pub mod response;
pub mod setup;
pub mod state;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use response::{ApiResponse, Empty};
pub use state::{AppState, UploadConfig};
