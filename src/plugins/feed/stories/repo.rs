use crate::http_error::AppError;
use crate::plugins::feed::stories::models::{StoryDto, StoryFeedRow};
use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

// expiry is fixed at 24h from the insert's statement clock so that
// created_at and expires_at share the same now()
pub async fn insert_story(
    pool: &PgPool,
    wedding_event_id: Uuid,
    guest_id: Uuid,
    media_url: &str,
    is_image: bool,
) -> Result<StoryDto, AppError> {
    let dto = sqlx::query_as::<_, StoryDto>("INSERT INTO stories (wedding_event_id, guest_id, media_url, is_image, expires_at) VALUES ($1,$2,$3,$4, now() + interval '24 hours') RETURNING id, wedding_event_id, guest_id, media_url, is_image, created_at, expires_at")
        .bind(wedding_event_id)
        .bind(guest_id)
        .bind(media_url)
        .bind(is_image)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn get_story(pool: &PgPool, wedding_event_id: Uuid, id: Uuid) -> Result<StoryDto, AppError> {
    let dto = sqlx::query_as::<_, StoryDto>("SELECT id, wedding_event_id, guest_id, media_url, is_image, created_at, expires_at FROM stories WHERE wedding_event_id = $1 AND id = $2")
        .bind(wedding_event_id)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

// expiry is a fetch-time filter: expired rows are never returned and never
// actively deleted here
pub async fn list_active(
    pool: &PgPool,
    wedding_event_id: Uuid,
    per_page: i64,
    offset: i64,
) -> Result<(Vec<StoryDto>, i64), AppError> {
    let items: Vec<StoryDto> = sqlx::query_as::<_, StoryDto>("SELECT id, wedding_event_id, guest_id, media_url, is_image, created_at, expires_at FROM stories WHERE wedding_event_id = $1 AND expires_at > now() ORDER BY created_at ASC LIMIT $2 OFFSET $3")
        .bind(wedding_event_id)
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stories WHERE wedding_event_id = $1 AND expires_at > now()")
        .bind(wedding_event_id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok((items, total))
}

pub async fn list_active_with_authors(pool: &PgPool, wedding_event_id: Uuid) -> Result<Vec<StoryFeedRow>, AppError> {
    let rows = sqlx::query_as::<_, StoryFeedRow>("SELECT s.id, s.wedding_event_id, s.guest_id, s.media_url, s.is_image, s.created_at, s.expires_at, g.display_name, g.avatar_url FROM stories s JOIN guests g ON g.id = s.guest_id WHERE s.wedding_event_id = $1 AND s.expires_at > now() ORDER BY s.created_at ASC")
        .bind(wedding_event_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(rows)
}

pub async fn delete_story(pool: &PgPool, id: Uuid, author: Uuid) -> Result<(), AppError> {
    let res = sqlx::query("DELETE FROM stories WHERE id = $1 AND guest_id = $2")
        .bind(id)
        .bind(author)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    if res.rows_affected() == 0 {
        return Err(AppError::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found"));
    }
    Ok(())
}
