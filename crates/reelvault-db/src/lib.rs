//! Reelvault metadata store
//!
//! The `VideoStore` trait is the only way the rest of the service touches
//! video records. `VideoRepository` backs it with Postgres; the in-memory
//! store behind the `test-helpers` feature backs HTTP tests.

pub mod db;
pub mod traits;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::VideoRepository;
pub use traits::VideoStore;
