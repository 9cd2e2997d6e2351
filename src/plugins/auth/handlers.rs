use axum::{Json, extract::State};
use axum::http::StatusCode;
use crate::http_error::AppError;
use crate::plugins::auth::models::{LoginRequest, LoginResponse};
use sqlx::PgPool;
use crate::plugins::auth::repo as repo;
use bcrypt::verify;
use jsonwebtoken::{EncodingKey, Header, encode, DecodingKey, Validation, decode};
use serde::Serialize;
use std::env;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use async_trait::async_trait;
use crate::plugins::guests::models::GuestDto;

#[derive(Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    evt: String,
    exp: usize,
}

/// Authenticated guest context extracted from the bearer token. Handlers take
/// this as an argument instead of reading any ambient session state.
#[derive(Clone)]
pub struct AuthGuest {
    pub guest_id: uuid::Uuid,
    pub event_id: uuid::Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthGuest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // middleware may already have decoded the token
        if let Some(auth) = parts.extensions.get::<AuthGuest>() {
            return Ok(auth.clone());
        }

        let auth_hdr = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "missing authorization").with_code("missing_token"))?;

        if !auth_hdr.starts_with("Bearer ") {
            return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalid authorization header").with_code("invalid_token"));
        }
        let token = &auth_hdr[7..];
        decode_token(token)
    }
}

pub fn decode_token(token: &str) -> Result<AuthGuest, AppError> {
    let secret = env::var("JWT_SECRET").map_err(|_| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "JWT_SECRET not configured").with_code("config_error"))?;
    let validation = Validation::default();
    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token").with_code("invalid_token"))?;
    let guest_id = uuid::Uuid::parse_str(&token_data.claims.sub).map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token subject").with_code("invalid_token"))?;
    let event_id = uuid::Uuid::parse_str(&token_data.claims.evt).map_err(|_| AppError::new(StatusCode::UNAUTHORIZED, "invalid token event").with_code("invalid_token"))?;
    Ok(AuthGuest { guest_id, event_id })
}

pub async fn login(State(pool): State<PgPool>, Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    if payload.event_code.is_empty() || payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "eventCodeUsernameAndPasswordRequired").with_code("invalid_credentials"));
    }

    let guest = repo::find_guest_for_login(&pool, &payload.event_code, &payload.username).await?;
    let (id, event_id, password_hash) = match guest {
        Some(row) => row,
        None => return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalidEventCodeOrCredentials").with_code("invalid_credentials")),
    };

    let valid = verify(&payload.password, &password_hash).map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if !valid {
        return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalidEventCodeOrCredentials").with_code("invalid_credentials"));
    }

    let secret = env::var("JWT_SECRET").map_err(|_| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "jwtSecretNotConfigured").with_code("config_error"))?;
    let exp = (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize;
    let claims = Claims { sub: id.to_string(), evt: event_id.to_string(), exp };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(LoginResponse { token }))
}

pub async fn whoami(State(pool): State<PgPool>, auth: AuthGuest) -> Result<Json<GuestDto>, AppError> {
    let guest = repo::get_guest_basic(&pool, auth.guest_id).await?;
    Ok(Json(guest))
}
