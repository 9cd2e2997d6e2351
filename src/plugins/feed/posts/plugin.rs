use axum::{Router, routing::get, routing::post, routing::delete, Extension};
use std::sync::Arc;
use crate::kernel::Plugin;
use crate::plugins::feed::posts::handlers::*;
use crate::realtime::EventHub;
use sqlx::PgPool;

pub struct PostsPlugin {
    pub pool: PgPool,
    pub hub: Arc<EventHub>,
}

impl PostsPlugin {
    pub fn new(pool: PgPool, hub: Arc<EventHub>) -> Self { Self { pool, hub } }
}

#[async_trait::async_trait]
impl Plugin for PostsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(create_post))
            .route("/", get(list_posts))
            .route("/:id", get(get_post))
            .route("/:id", delete(delete_post))
            .route("/:id/like", post(like_post))
            .route("/:id/like", delete(unlike_post))
            .route("/:id/comments", get(list_comments))
            .route("/:id/comments", post(create_comment))
            .route("/:id/comments/:comment_id", delete(delete_comment))
            .layer(axum::middleware::from_fn(crate::plugins::auth::middleware::require_auth))
            .layer(Extension(self.pool.clone()))
            .layer(Extension(self.hub.clone()))
    }

    fn name(&self) -> &'static str { "feed/posts" }
}
