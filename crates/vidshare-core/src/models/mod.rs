//! Data models for the application
//!
//! One sub-module per entity. Wire format is camelCase; owner and parent
//! references serialize under their short names (`owner`, `video`).

mod asset;
mod comment;
mod like;
mod playlist;
mod tweet;
mod user;
mod video;

pub use asset::*;
pub use comment::*;
pub use like::*;
pub use playlist::*;
pub use tweet::*;
pub use user::*;
pub use video::*;
