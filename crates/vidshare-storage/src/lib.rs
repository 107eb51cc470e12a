//! Vidshare Storage Library
//!
//! The media store adapter: uploads local temporary files (videos and
//! thumbnails) to a remote asset store and deletes them again by URL.
//!
//! # Asset URL format
//!
//! Every backend hands out URLs of the form
//! `{base}/{kind}/upload/v{version}/{public_id}.{ext}`. Deletion only ever
//! receives that URL back, so the public id and resource kind are recovered
//! from it by [`parse_asset_url`].

pub mod asset_url;
#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub(crate) mod temp_file;
pub mod traits;

// Re-export commonly used types
pub use asset_url::{parse_asset_url, AssetRef};
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::CloudinaryStore;
pub use factory::create_media_store;
#[cfg(feature = "storage-local")]
pub use local::LocalMediaStore;
pub use traits::{MediaStore, ResourceKind, StorageError, StorageResult, StoredAsset};
pub use vidshare_core::MediaBackend;
