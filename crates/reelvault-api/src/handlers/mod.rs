pub mod admin;
pub mod health;
pub mod thumbnail_upload;
pub mod video_get;
pub mod video_upload;
