pub mod health;
pub mod metrics;
pub mod auth;
pub mod events;
pub mod guests;
pub mod feed;
pub mod realtime;
