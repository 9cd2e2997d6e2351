use sqlx::PgPool;
use crate::http_error::AppError;
use crate::plugins::guests::models::GuestDto;
use uuid::Uuid;
use sqlx::Row;

pub async fn find_guest_for_login(pool: &PgPool, event_code: &str, username: &str) -> Result<Option<(Uuid, Uuid, String)>, AppError> {
    let opt = sqlx::query("SELECT g.id, g.wedding_event_id, g.password_hash FROM guests g JOIN wedding_events e ON e.id = g.wedding_event_id WHERE e.event_code = $1 AND g.username = $2")
        .bind(event_code)
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(AppError::from)?;

    if let Some(r) = opt {
        let id: Uuid = r.get("id");
        let wedding_event_id: Uuid = r.get("wedding_event_id");
        let password_hash: String = r.get("password_hash");
        Ok(Some((id, wedding_event_id, password_hash)))
    } else {
        Ok(None)
    }
}

pub async fn get_guest_basic(pool: &PgPool, id: Uuid) -> Result<GuestDto, AppError> {
    let r = sqlx::query("SELECT id, wedding_event_id, username, display_name, avatar_url FROM guests WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::from)?;
    Ok(GuestDto {
        id: r.get("id"),
        wedding_event_id: r.get("wedding_event_id"),
        username: r.get("username"),
        display_name: r.get("display_name"),
        avatar_url: r.get("avatar_url"),
    })
}
