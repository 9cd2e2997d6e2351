use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct GuestDto {
    pub id: Uuid,
    pub wedding_event_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterGuest {
    pub event_code: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub avatar_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateGuest {
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
