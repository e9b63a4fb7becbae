//! Postgres repositories.

mod video;

pub use video::VideoRepository;
