//! Reelvault Core Library
//!
//! Domain models, error types and configuration shared by every reelvault crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

pub use config::{BaseConfig, Config, IngestConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
