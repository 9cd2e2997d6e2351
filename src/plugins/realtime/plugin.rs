use axum::{Router, routing::get, Extension};
use std::sync::Arc;
use crate::kernel::Plugin;
use crate::plugins::realtime::handlers::ws_upgrade;
use crate::realtime::EventHub;

pub struct RealtimePlugin {
    pub hub: Arc<EventHub>,
}

impl RealtimePlugin {
    pub fn new(hub: Arc<EventHub>) -> Self { Self { hub } }
}

#[async_trait::async_trait]
impl Plugin for RealtimePlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(ws_upgrade))
            .layer(Extension(self.hub.clone()))
    }

    fn name(&self) -> &'static str { "realtime" }
}
