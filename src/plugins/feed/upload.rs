use axum::{Router, routing::post, extract::Multipart, Json};
use crate::http_error::AppError;
use crate::kernel::Plugin;
use crate::plugins::feed::media;
use axum::http::StatusCode;
use std::path::PathBuf;
use uuid::Uuid;

pub async fn upload_file(mut multipart: Multipart) -> Result<Json<serde_json::Value>, AppError> {
    // ensure upload dir exists
    let mut uploaded_urls: Vec<String> = Vec::new();
    let mut kinds: Vec<media::MediaKind> = Vec::new();
    let base_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".to_string());
    let base_dir = std::path::Path::new(&base_dir);
    if !base_dir.exists() {
        std::fs::create_dir_all(base_dir).map_err(|e| AppError::from((StatusCode::INTERNAL_SERVER_ERROR, format!("failed to create upload dir: {}", e))))?;
    }

    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::from((StatusCode::BAD_REQUEST, format!("multipart error: {}", e))))? {
        if let Some(filename_orig) = field.file_name() {
            let filename = filename_orig.to_string();
            let data = field.bytes().await.map_err(|e| AppError::from((StatusCode::BAD_REQUEST, format!("multipart read error: {}", e))))?;
            let ext = std::path::Path::new(&filename).extension().and_then(|s| s.to_str()).unwrap_or("bin");
            let fname = format!("{}-{}.{}", Uuid::new_v4(), chrono::Utc::now().timestamp(), ext);
            let mut path = PathBuf::from(base_dir);
            path.push(&fname);
            tokio::fs::write(&path, &data).await.map_err(|e| AppError::from((StatusCode::INTERNAL_SERVER_ERROR, format!("write error: {}", e))))?;
            let url = format!("/uploads/{}", fname);
            kinds.push(media::media_kind(&url));
            uploaded_urls.push(url);
        }
    }

    Ok(Json(serde_json::json!({ "uploaded": uploaded_urls, "kinds": kinds })))
}

pub struct UploadPlugin;

impl UploadPlugin {
    pub fn new() -> Self { Self }
}

impl Default for UploadPlugin {
    fn default() -> Self { Self::new() }
}

#[async_trait::async_trait]
impl Plugin for UploadPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(upload_file))
            .layer(axum::middleware::from_fn(crate::plugins::auth::middleware::require_auth))
    }

    fn name(&self) -> &'static str { "feed/upload" }
}
