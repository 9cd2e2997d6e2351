pub mod handlers;
pub mod models;
mod plugin;
pub mod repo;

pub use plugin::GuestsPlugin;
