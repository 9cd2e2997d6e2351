use axum::{extract::Path, Json, Extension};
use axum::http::StatusCode;
use std::sync::Arc;
use crate::http_error::AppError;
use crate::plugins::auth::handlers::AuthGuest;
use crate::plugins::feed::media;
use crate::plugins::feed::posts::models::{CommentCreate, CommentDto, PostCreate, PostDto};
use crate::plugins::feed::posts::repo;
use crate::plugins::feed::shared::ListResponse;
use crate::realtime::{EventHub, FeedEvent};
use sqlx::PgPool;

#[derive(Debug, serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub guest_id: Option<uuid::Uuid>,
}

pub async fn create_post(
    Extension(pool): Extension<PgPool>,
    Extension(hub): Extension<Arc<EventHub>>,
    auth: AuthGuest,
    Json(payload): Json<PostCreate>,
) -> Result<Json<PostDto>, AppError> {
    let body = payload.body.as_deref().filter(|b| !b.is_empty());
    let media_url = payload.media_url.as_deref().filter(|u| !u.is_empty());
    if body.is_none() && media_url.is_none() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "bodyOrMediaRequired").with_code("empty_post"));
    }

    let is_image = media_url.map(media::is_image);
    let dto = repo::insert_post(&pool, auth.event_id, auth.guest_id, body, media_url, is_image).await?;

    hub.publish(auth.event_id, FeedEvent::PostCreated { post_id: dto.id, guest_id: auth.guest_id });
    Ok(Json(dto))
}

pub async fn list_posts(
    Extension(pool): Extension<PgPool>,
    auth: AuthGuest,
    axum::extract::Query(q): axum::extract::Query<ListQuery>,
) -> Result<Json<ListResponse<PostDto>>, AppError> {
    let page = q.page.unwrap_or(1).max(1);
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100);
    let offset = ((page - 1) * per_page) as i64;

    let (items, total) = repo::list_posts(&pool, auth.event_id, auth.guest_id, q.guest_id, per_page as i64, offset).await?;

    let fetched = items.len() as i64;
    let has_more = offset + fetched < total;
    let total_pages = if total == 0 { 0 } else { ((total as f64) / (per_page as f64)).ceil() as i64 };
    let resp = ListResponse { items, page, per_page, total, total_pages, has_more };
    Ok(Json(resp))
}

pub async fn get_post(Extension(pool): Extension<PgPool>, auth: AuthGuest, Path(id): Path<uuid::Uuid>) -> Result<Json<PostDto>, AppError> {
    let dto = repo::get_post(&pool, auth.event_id, auth.guest_id, id).await?;
    Ok(Json(dto))
}

pub async fn delete_post(Extension(pool): Extension<PgPool>, auth: AuthGuest, Path(id): Path<uuid::Uuid>) -> Result<StatusCode, AppError> {
    repo::delete_post(&pool, id, auth.guest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    Extension(pool): Extension<PgPool>,
    Extension(hub): Extension<Arc<EventHub>>,
    auth: AuthGuest,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, AppError> {
    repo::insert_like(&pool, id, auth.guest_id, auth.event_id).await?;
    hub.publish(auth.event_id, FeedEvent::PostLiked { post_id: id, guest_id: auth.guest_id });
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike_post(Extension(pool): Extension<PgPool>, auth: AuthGuest, Path(id): Path<uuid::Uuid>) -> Result<StatusCode, AppError> {
    repo::delete_like(&pool, id, auth.guest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(Extension(pool): Extension<PgPool>, auth: AuthGuest, Path(id): Path<uuid::Uuid>) -> Result<Json<Vec<CommentDto>>, AppError> {
    let items = repo::list_comments(&pool, id, auth.event_id).await?;
    Ok(Json(items))
}

pub async fn create_comment(
    Extension(pool): Extension<PgPool>,
    Extension(hub): Extension<Arc<EventHub>>,
    auth: AuthGuest,
    Path(id): Path<uuid::Uuid>,
    Json(payload): Json<CommentCreate>,
) -> Result<Json<CommentDto>, AppError> {
    if payload.body.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "bodyRequired").with_code("empty_comment"));
    }
    let dto = repo::insert_comment(&pool, id, auth.guest_id, auth.event_id, &payload.body).await?;
    hub.publish(auth.event_id, FeedEvent::CommentAdded { post_id: id, comment_id: dto.id, guest_id: auth.guest_id });
    Ok(Json(dto))
}

pub async fn delete_comment(
    Extension(pool): Extension<PgPool>,
    auth: AuthGuest,
    Path((_post_id, comment_id)): Path<(uuid::Uuid, uuid::Uuid)>,
) -> Result<StatusCode, AppError> {
    repo::delete_comment(&pool, comment_id, auth.guest_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
