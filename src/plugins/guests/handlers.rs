use axum::{Json, extract::Path};
use axum::http::StatusCode;
use sqlx::PgPool;
use crate::plugins::events::repo as events_repo;
use crate::plugins::guests::models::{GuestDto, RegisterGuest, UpdateGuest};
use crate::plugins::guests::repo;
use uuid::Uuid;
use crate::http_error::AppError;

pub async fn register_guest(pool: PgPool, payload: RegisterGuest) -> Result<Json<GuestDto>, AppError> {
    if payload.username.is_empty() || payload.display_name.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "usernameAndDisplayNameRequired"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "password too short"));
    }

    let event_id = events_repo::find_event_by_code(&pool, &payload.event_code)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, "unknownEventCode").with_code("unknown_event_code"))?;

    let dto = repo::insert_guest(&pool, event_id, &payload.username, &payload.display_name, &payload.password, payload.avatar_url.as_deref()).await?;
    Ok(Json(dto))
}

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub wedding_event_id: Option<Uuid>,
}

pub async fn list_guests(pool: PgPool, q: ListQuery) -> Result<Json<Vec<GuestDto>>, AppError> {
    let guests = repo::list_guests(&pool, q.wedding_event_id).await?;
    Ok(Json(guests))
}

pub async fn get_guest(pool: PgPool, Path(id): Path<Uuid>) -> Result<Json<GuestDto>, AppError> {
    let dto = repo::get_guest(&pool, id).await?;
    Ok(Json(dto))
}

pub async fn update_guest(pool: PgPool, Path(id): Path<Uuid>, Json(payload): Json<UpdateGuest>) -> Result<Json<GuestDto>, AppError> {
    let current = repo::get_guest(&pool, id).await?;

    let new_display_name = payload.display_name.unwrap_or(current.display_name);
    let new_avatar = payload.avatar_url.or(current.avatar_url);

    let dto = repo::update_guest(&pool, id, &new_display_name, new_avatar.as_deref()).await?;
    Ok(Json(dto))
}

pub async fn delete_guest(pool: PgPool, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    repo::delete_guest(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
