pub mod upload;
pub mod videos;
