use axum::{Router, routing::{post, get, put, delete}, Json, extract::{Path, Query}};
use sqlx::PgPool;
use crate::kernel::Plugin;
use crate::plugins::guests::models::{RegisterGuest, UpdateGuest};
use crate::plugins::guests::handlers::{register_guest, list_guests, get_guest, update_guest, delete_guest, ListQuery};

pub struct GuestsPlugin {
    pub pool: PgPool,
}

impl GuestsPlugin {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Plugin for GuestsPlugin {
    async fn router(&self) -> Router {
        let p_register = self.pool.clone();
        let p_list = self.pool.clone();
        let p_get = self.pool.clone();
        let p_update = self.pool.clone();
        let p_delete = self.pool.clone();

        Router::new()
            .route("/", post(move |Json(payload): Json<RegisterGuest>| {
                let pool = p_register.clone();
                async move { register_guest(pool, payload).await }
            }))
            .route("/", get(move |Query(q): Query<ListQuery>| {
                let pool = p_list.clone();
                async move { list_guests(pool, q).await }
            }))
            .route("/:id", get(move |Path(id): Path<uuid::Uuid>| {
                let pool = p_get.clone();
                async move { get_guest(pool, Path(id)).await }
            }))
            .route("/:id", put(move |Path(id): Path<uuid::Uuid>, Json(payload): Json<UpdateGuest>| {
                let pool = p_update.clone();
                async move { update_guest(pool, Path(id), Json(payload)).await }
            }))
            .route("/:id", delete(move |Path(id): Path<uuid::Uuid>| {
                let pool = p_delete.clone();
                async move { delete_guest(pool, Path(id)).await }
            }))
    }

    fn name(&self) -> &'static str {
        "guests"
    }
}
