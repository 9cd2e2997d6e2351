use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct WeddingEventDto {
    pub id: uuid::Uuid,
    pub name: String,
    pub event_code: String,
    pub event_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize)]
pub struct CreateWeddingEvent {
    pub name: String,
    pub event_code: String,
    pub event_date: Option<chrono::NaiveDate>,
}

#[derive(Deserialize)]
pub struct UpdateWeddingEvent {
    pub name: Option<String>,
    pub event_date: Option<chrono::NaiveDate>,
}
