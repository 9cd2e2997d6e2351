use axum::{Router, routing::get, routing::post, routing::delete, Extension};
use std::sync::Arc;
use crate::cache::DynCache;
use crate::kernel::Plugin;
use crate::plugins::feed::stories::handlers::*;
use crate::realtime::EventHub;
use sqlx::PgPool;

pub struct StoriesPlugin {
    pub pool: PgPool,
    pub hub: Arc<EventHub>,
    pub cache: DynCache,
}

impl StoriesPlugin {
    pub fn new(pool: PgPool, hub: Arc<EventHub>, cache: DynCache) -> Self {
        Self { pool, hub, cache }
    }
}

#[async_trait::async_trait]
impl Plugin for StoriesPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_story))
            .route("/", get(list_stories))
            .route("/grouped", get(grouped_stories))
            .route("/:id", get(get_story))
            .route("/:id", delete(delete_story))
            .layer(axum::middleware::from_fn(crate::plugins::auth::middleware::require_auth))
            .layer(Extension(self.pool.clone()))
            .layer(Extension(self.hub.clone()))
            .layer(Extension(self.cache.clone()))
    }

    fn name(&self) -> &'static str { "feed/stories" }
}
