//! Reelvault Storage Library
//!
//! Durable store abstraction with S3 and local filesystem backends.
//!
//! # Storage key format
//!
//! Keys are `<namespace>/<token>.<extension>` where the token is 64 hex
//! characters drawn from a CSPRNG. Videos are namespaced by aspect category
//! (`landscape`, `portrait`, `other`), thumbnails by `thumbnails`.
//!
//! Stores never build public URLs themselves; `PublicUrlBuilder` does that from
//! configuration so a CDN can front any backend.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod urls;

// Re-export commonly used types
pub use factory::{create_storage, create_url_builder};
pub use keys::generate_asset_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use reelvault_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use urls::PublicUrlBuilder;
