use axum::{Router, routing::get, routing::post, routing::put, routing::delete, Extension};
use crate::kernel::Plugin;
use crate::plugins::events::handlers::*;
use sqlx::PgPool;

pub struct EventsPlugin { pub pool: PgPool }

impl EventsPlugin {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait::async_trait]
impl Plugin for EventsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_event))
            .route("/", get(list_events))
            .route("/:id", get(get_event))
            .route("/:id", put(update_event))
            .route("/:id", delete(delete_event))
            .layer(Extension(self.pool.clone()))
    }

    fn name(&self) -> &'static str { "events" }
}
