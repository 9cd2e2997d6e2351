pub mod handlers;
pub mod models;
pub mod repo;
mod plugin;

pub use plugin::EventsPlugin;
