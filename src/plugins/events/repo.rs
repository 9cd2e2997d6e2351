use crate::http_error::AppError;
use crate::plugins::events::models::WeddingEventDto;
use sqlx::PgPool;
use uuid::Uuid;
use sqlx::Row;

pub async fn insert_event(pool: &PgPool, name: &str, event_code: &str, event_date: Option<chrono::NaiveDate>) -> Result<WeddingEventDto, AppError> {
    let dto = sqlx::query_as::<_, WeddingEventDto>("INSERT INTO wedding_events (name, event_code, event_date) VALUES ($1,$2,$3) RETURNING id, name, event_code, event_date, created_at")
        .bind(name)
        .bind(event_code)
        .bind(event_date)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn list_events(pool: &PgPool) -> Result<Vec<WeddingEventDto>, AppError> {
    let items = sqlx::query_as::<_, WeddingEventDto>("SELECT id, name, event_code, event_date, created_at FROM wedding_events ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .map_err(AppError::from)?;
    Ok(items)
}

pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<WeddingEventDto, AppError> {
    let dto = sqlx::query_as::<_, WeddingEventDto>("SELECT id, name, event_code, event_date, created_at FROM wedding_events WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn find_event_by_code(pool: &PgPool, event_code: &str) -> Result<Option<Uuid>, AppError> {
    let opt = sqlx::query("SELECT id FROM wedding_events WHERE event_code = $1")
        .bind(event_code)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;
    Ok(opt.map(|r| r.get("id")))
}

pub async fn update_event(pool: &PgPool, id: Uuid, name: Option<String>, event_date: Option<chrono::NaiveDate>) -> Result<WeddingEventDto, AppError> {
    let dto = sqlx::query_as::<_, WeddingEventDto>("UPDATE wedding_events SET name = COALESCE($1, name), event_date = COALESCE($2, event_date) WHERE id = $3 RETURNING id, name, event_code, event_date, created_at")
        .bind(name)
        .bind(event_date)
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(dto)
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM wedding_events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::from)?;
    Ok(())
}
