use sqlx::PgPool;
use sqlx::Row;
use axum::http::StatusCode;
use crate::http_error::AppError;
use crate::plugins::guests::models::GuestDto;
use uuid::Uuid;
use bcrypt::{hash, DEFAULT_COST};

fn row_to_dto(r: sqlx::postgres::PgRow) -> GuestDto {
    GuestDto {
        id: r.get("id"),
        wedding_event_id: r.get("wedding_event_id"),
        username: r.get("username"),
        display_name: r.get("display_name"),
        avatar_url: r.get("avatar_url"),
    }
}

pub async fn insert_guest(pool: &PgPool, wedding_event_id: Uuid, username: &str, display_name: &str, password: &str, avatar_url: Option<&str>) -> Result<GuestDto, AppError> {
    let password_hash = hash(password, DEFAULT_COST).map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let row = sqlx::query("INSERT INTO guests (wedding_event_id, username, display_name, password_hash, avatar_url) VALUES ($1, $2, $3, $4, $5) RETURNING id, wedding_event_id, username, display_name, avatar_url")
        .bind(wedding_event_id)
        .bind(username)
        .bind(display_name)
        .bind(&password_hash)
        .bind(avatar_url)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(row_to_dto(row))
}

pub async fn list_guests(pool: &PgPool, wedding_event_id: Option<Uuid>) -> Result<Vec<GuestDto>, AppError> {
    let rows = match wedding_event_id {
        Some(event_id) => {
            sqlx::query("SELECT id, wedding_event_id, username, display_name, avatar_url FROM guests WHERE wedding_event_id = $1 ORDER BY created_at DESC")
                .bind(event_id)
                .fetch_all(pool)
                .await
                .map_err(AppError::from)?
        }
        None => {
            sqlx::query("SELECT id, wedding_event_id, username, display_name, avatar_url FROM guests ORDER BY created_at DESC")
                .fetch_all(pool)
                .await
                .map_err(AppError::from)?
        }
    };

    Ok(rows.into_iter().map(row_to_dto).collect())
}

pub async fn get_guest(pool: &PgPool, id: Uuid) -> Result<GuestDto, AppError> {
    let row = sqlx::query("SELECT id, wedding_event_id, username, display_name, avatar_url FROM guests WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(row_to_dto(row))
}

pub async fn update_guest(pool: &PgPool, id: Uuid, display_name: &str, avatar_url: Option<&str>) -> Result<GuestDto, AppError> {
    let row = sqlx::query("UPDATE guests SET display_name = $1, avatar_url = $2 WHERE id = $3 RETURNING id, wedding_event_id, username, display_name, avatar_url")
        .bind(display_name)
        .bind(avatar_url)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;

    Ok(row_to_dto(row))
}

pub async fn delete_guest(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM guests WHERE id = $1").bind(id).execute(pool).await.map_err(AppError::from)?;
    Ok(())
}
