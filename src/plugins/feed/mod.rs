pub mod shared;
pub mod media;
pub mod upload;
pub mod posts;
pub mod stories;
