use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug)]
pub struct PostCreate {
    pub body: Option<String>,
    pub media_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct PostDto {
    pub id: uuid::Uuid,
    pub wedding_event_id: uuid::Uuid,
    pub guest_id: uuid::Uuid,
    pub body: Option<String>,
    pub media_url: Option<String>,
    pub is_image: Option<bool>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommentCreate {
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct CommentDto {
    pub id: uuid::Uuid,
    pub post_id: uuid::Uuid,
    pub guest_id: uuid::Uuid,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
