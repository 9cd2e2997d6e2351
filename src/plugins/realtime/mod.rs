pub mod handlers;
pub mod plugin;

pub use plugin::RealtimePlugin;
