pub mod handlers;
pub mod models;
pub mod playback;
pub mod plugin;
pub mod repo;
