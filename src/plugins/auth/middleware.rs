use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use axum::middleware::Next;
use crate::http_error::AppError;

pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, AppError> {
    let auth_hdr = req.headers().get("authorization").and_then(|v| v.to_str().ok()).ok_or_else(|| AppError::new(StatusCode::UNAUTHORIZED, "missing authorization").with_code("missing_token"))?;
    if !auth_hdr.starts_with("Bearer ") {
        return Err(AppError::new(StatusCode::UNAUTHORIZED, "invalid authorization header").with_code("invalid_token"));
    }
    let token = &auth_hdr[7..];
    let auth = super::handlers::decode_token(token)?;
    // insert into extensions for handlers to use
    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}
