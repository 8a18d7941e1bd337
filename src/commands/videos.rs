use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio_util::io::ReaderStream;

use super::AppState;

// Отдаем только то, что сгенерировал пайплайн
static VIDEO_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^output_[0-9a-f]{6}\.mp4$").expect("valid regex"));

pub fn is_video_name(name: &str) -> bool {
    VIDEO_NAME.is_match(name)
}

/// GET /videos/:name
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    if !is_video_name(&name) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.work_dir.join(&name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Video {} is not available: {}", path.display(), e);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let body = Body::from_stream(ReaderStream::new(file));
    ([(header::CONTENT_TYPE, "video/mp4")], body).into_response()
}
