use crate::http_error::AppError;
use crate::plugins::feed::posts::models::{CommentDto, PostDto};
use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn insert_post(
    pool: &PgPool,
    wedding_event_id: Uuid,
    guest_id: Uuid,
    body: Option<&str>,
    media_url: Option<&str>,
    is_image: Option<bool>,
) -> Result<PostDto, AppError> {
    let dto = sqlx::query_as::<_, PostDto>("INSERT INTO posts (wedding_event_id, guest_id, body, media_url, is_image) VALUES ($1,$2,$3,$4,$5) RETURNING id, wedding_event_id, guest_id, body, media_url, is_image, created_at, 0::bigint AS like_count, 0::bigint AS comment_count, false AS liked_by_me")
        .bind(wedding_event_id)
        .bind(guest_id)
        .bind(body)
        .bind(media_url)
        .bind(is_image)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn get_post(pool: &PgPool, wedding_event_id: Uuid, viewer: Uuid, id: Uuid) -> Result<PostDto, AppError> {
    let dto = sqlx::query_as::<_, PostDto>("SELECT p.id, p.wedding_event_id, p.guest_id, p.body, p.media_url, p.is_image, p.created_at, (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comment_count, EXISTS(SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.guest_id = $2) AS liked_by_me FROM posts p WHERE p.wedding_event_id = $1 AND p.id = $3")
        .bind(wedding_event_id)
        .bind(viewer)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn list_posts(
    pool: &PgPool,
    wedding_event_id: Uuid,
    viewer: Uuid,
    guest_filter: Option<Uuid>,
    per_page: i64,
    offset: i64,
) -> Result<(Vec<PostDto>, i64), AppError> {
    let items: Vec<PostDto> = match guest_filter {
        Some(guest_id) => {
            sqlx::query_as::<_, PostDto>("SELECT p.id, p.wedding_event_id, p.guest_id, p.body, p.media_url, p.is_image, p.created_at, (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comment_count, EXISTS(SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.guest_id = $2) AS liked_by_me FROM posts p WHERE p.wedding_event_id = $1 AND p.guest_id = $3 ORDER BY p.created_at DESC LIMIT $4 OFFSET $5")
                .bind(wedding_event_id)
                .bind(viewer)
                .bind(guest_id)
                .bind(per_page)
                .bind(offset)
                .fetch_all(pool)
                .await
                .map_err(AppError::from)?
        }
        None => {
            sqlx::query_as::<_, PostDto>("SELECT p.id, p.wedding_event_id, p.guest_id, p.body, p.media_url, p.is_image, p.created_at, (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, (SELECT COUNT(*) FROM post_comments c WHERE c.post_id = p.id) AS comment_count, EXISTS(SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.guest_id = $2) AS liked_by_me FROM posts p WHERE p.wedding_event_id = $1 ORDER BY p.created_at DESC LIMIT $3 OFFSET $4")
                .bind(wedding_event_id)
                .bind(viewer)
                .bind(per_page)
                .bind(offset)
                .fetch_all(pool)
                .await
                .map_err(AppError::from)?
        }
    };

    let total: i64 = match guest_filter {
        Some(guest_id) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE wedding_event_id = $1 AND guest_id = $2")
                .bind(wedding_event_id)
                .bind(guest_id)
                .fetch_one(pool)
                .await
                .map_err(AppError::from)?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE wedding_event_id = $1")
                .bind(wedding_event_id)
                .fetch_one(pool)
                .await
                .map_err(AppError::from)?
        }
    };

    Ok((items, total))
}

pub async fn delete_post(pool: &PgPool, id: Uuid, author: Uuid) -> Result<(), AppError> {
    let res = sqlx::query("DELETE FROM posts WHERE id = $1 AND guest_id = $2")
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

// the insert is scoped to the liker's event so a guest cannot like into
// another wedding; zero rows means the post wasn't visible to them
pub async fn insert_like(pool: &PgPool, post_id: Uuid, guest_id: Uuid, wedding_event_id: Uuid) -> Result<(), AppError> {
    let res = sqlx::query("INSERT INTO post_likes (post_id, guest_id) SELECT p.id, $2 FROM posts p WHERE p.id = $1 AND p.wedding_event_id = $3")
        .bind(post_id)
        .bind(guest_id)
        .bind(wedding_event_id)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    if res.rows_affected() == 0 {
        return Err(AppError::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found"));
    }
    Ok(())
}

pub async fn delete_like(pool: &PgPool, post_id: Uuid, guest_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND guest_id = $2")
        .bind(post_id)
        .bind(guest_id)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    Ok(())
}

pub async fn insert_comment(pool: &PgPool, post_id: Uuid, guest_id: Uuid, wedding_event_id: Uuid, body: &str) -> Result<CommentDto, AppError> {
    let dto = sqlx::query_as::<_, CommentDto>("INSERT INTO post_comments (post_id, guest_id, body) SELECT p.id, $2, $4 FROM posts p WHERE p.id = $1 AND p.wedding_event_id = $3 RETURNING id, post_id, guest_id, body, created_at")
        .bind(post_id)
        .bind(guest_id)
        .bind(wedding_event_id)
        .bind(body)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn list_comments(pool: &PgPool, post_id: Uuid, wedding_event_id: Uuid) -> Result<Vec<CommentDto>, AppError> {
    let items = sqlx::query_as::<_, CommentDto>("SELECT c.id, c.post_id, c.guest_id, c.body, c.created_at FROM post_comments c JOIN posts p ON p.id = c.post_id WHERE c.post_id = $1 AND p.wedding_event_id = $2 ORDER BY c.created_at ASC")
        .bind(post_id)
        .bind(wedding_event_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(items)
}

pub async fn delete_comment(pool: &PgPool, comment_id: Uuid, author: Uuid) -> Result<(), AppError> {
    let res = sqlx::query("DELETE FROM post_comments WHERE id = $1 AND guest_id = $2")
        .bind(comment_id)
        .bind(author)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    if res.rows_affected() == 0 {
        return Err(AppError::new(StatusCode::NOT_FOUND, "notFound").with_code("not_found"));
    }
    Ok(())
}
