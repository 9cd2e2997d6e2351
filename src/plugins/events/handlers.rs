use axum::{extract::Path, Json, Extension};
use axum::http::StatusCode;
use crate::http_error::AppError;
use crate::plugins::events::models::{CreateWeddingEvent, UpdateWeddingEvent, WeddingEventDto};
use crate::plugins::events::repo;
use sqlx::PgPool;

pub async fn create_event(Extension(pool): Extension<PgPool>, Json(payload): Json<CreateWeddingEvent>) -> Result<Json<WeddingEventDto>, AppError> {
    if payload.name.is_empty() || payload.event_code.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "nameAndEventCodeRequired"));
    }
    let dto = repo::insert_event(&pool, &payload.name, &payload.event_code, payload.event_date).await?;
    Ok(Json(dto))
}

pub async fn list_events(Extension(pool): Extension<PgPool>) -> Result<Json<Vec<WeddingEventDto>>, AppError> {
    let items = repo::list_events(&pool).await?;
    Ok(Json(items))
}

pub async fn get_event(Extension(pool): Extension<PgPool>, Path(id): Path<uuid::Uuid>) -> Result<Json<WeddingEventDto>, AppError> {
    let dto = repo::get_event(&pool, id).await?;
    Ok(Json(dto))
}

pub async fn update_event(Extension(pool): Extension<PgPool>, Path(id): Path<uuid::Uuid>, Json(payload): Json<UpdateWeddingEvent>) -> Result<Json<WeddingEventDto>, AppError> {
    let dto = repo::update_event(&pool, id, payload.name, payload.event_date).await?;
    Ok(Json(dto))
}

pub async fn delete_event(Extension(pool): Extension<PgPool>, Path(id): Path<uuid::Uuid>) -> Result<StatusCode, AppError> {
    repo::delete_event(&pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
