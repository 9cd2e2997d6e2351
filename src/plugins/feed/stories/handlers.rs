use axum::{extract::Path, Json, Extension};
use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use crate::cache::DynCache;
use crate::http_error::AppError;
use crate::plugins::auth::handlers::AuthGuest;
use crate::plugins::feed::media;
use crate::plugins::feed::shared::ListResponse;
use crate::plugins::feed::stories::models::{group_stories, StoryCreate, StoryDto, StoryGroup};
use crate::plugins::feed::stories::repo;
use crate::realtime::{EventHub, FeedEvent};
use sqlx::PgPool;

const GROUPED_CACHE_TTL: Duration = Duration::from_secs(10);

fn grouped_cache_key(event_id: uuid::Uuid) -> String {
    format!("stories:grouped:{}", event_id)
}

#[derive(Debug, serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn create_story(
    Extension(pool): Extension<PgPool>,
    Extension(hub): Extension<Arc<EventHub>>,
    Extension(cache): Extension<DynCache>,
    auth: AuthGuest,
    Json(payload): Json<StoryCreate>,
) -> Result<Json<StoryDto>, AppError> {
    if payload.media_url.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "mediaUrlRequired").with_code("empty_story"));
    }

    let is_image = media::is_image(&payload.media_url);
    let dto = repo::insert_story(&pool, auth.event_id, auth.guest_id, &payload.media_url, is_image).await?;

    let _ = cache.delete(&grouped_cache_key(auth.event_id)).await;
    hub.publish(auth.event_id, FeedEvent::StoryCreated { story_id: dto.id, guest_id: auth.guest_id });
    Ok(Json(dto))
}

pub async fn list_stories(
    Extension(pool): Extension<PgPool>,
    auth: AuthGuest,
    axum::extract::Query(q): axum::extract::Query<ListQuery>,
) -> Result<Json<ListResponse<StoryDto>>, AppError> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(50).clamp(1, 200);
    let offset = ((page - 1) * per_page) as i64;

    let (items, total) = repo::list_active(&pool, auth.event_id, per_page as i64, offset).await?;

    let fetched = items.len() as i64;
    let has_more = offset + fetched < total;
    let total_pages = if total == 0 { 0 } else { ((total as f64) / (per_page as f64)).ceil() as i64 };
    let resp = ListResponse { items, page, per_page, total, total_pages, has_more };
    Ok(Json(resp))
}

pub async fn grouped_stories(
    Extension(pool): Extension<PgPool>,
    Extension(cache): Extension<DynCache>,
    auth: AuthGuest,
) -> Result<Json<Vec<StoryGroup>>, AppError> {
    let key = grouped_cache_key(auth.event_id);
    if let Ok(Some(bytes)) = cache.get(&key).await {
        if let Ok(groups) = serde_json::from_slice::<Vec<StoryGroup>>(&bytes) {
            return Ok(Json(groups));
        }
    }

    let rows = repo::list_active_with_authors(&pool, auth.event_id).await?;
    let groups = group_stories(rows);

    if let Ok(bytes) = serde_json::to_vec(&groups) {
        let _ = cache.set(&key, bytes, Some(GROUPED_CACHE_TTL)).await;
    }
    Ok(Json(groups))
}

pub async fn get_story(Extension(pool): Extension<PgPool>, auth: AuthGuest, Path(id): Path<uuid::Uuid>) -> Result<Json<StoryDto>, AppError> {
    let dto = repo::get_story(&pool, auth.event_id, id).await?;
    Ok(Json(dto))
}

pub async fn delete_story(
    Extension(pool): Extension<PgPool>,
    Extension(hub): Extension<Arc<EventHub>>,
    Extension(cache): Extension<DynCache>,
    auth: AuthGuest,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, AppError> {
    repo::delete_story(&pool, id, auth.guest_id).await?;
    let _ = cache.delete(&grouped_cache_key(auth.event_id)).await;
    hub.publish(auth.event_id, FeedEvent::StoryDeleted { story_id: id, guest_id: auth.guest_id });
    Ok(StatusCode::NO_CONTENT)
}
