// HTTP layer: the browser form, generation endpoints and video playback
// Each handler validates input, calls the pipeline and turns the outcome into a status message

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::services::TalkingHeadGenerator;

pub mod generate;
pub mod utility;
pub mod videos;

#[cfg(test)]
mod tests;

/// Максимальный размер загружаемой формы
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Состояние, общее для всех обработчиков
pub struct AppState {
    pub config: AppConfig,
    pub generator: TalkingHeadGenerator,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, generator: TalkingHeadGenerator) -> Self {
        Self {
            config,
            generator,
            started_at: Utc::now(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(utility::index))
        .route("/health", get(utility::health))
        .route("/api/languages", get(utility::languages))
        .route("/api/preview", post(generate::preview_audio))
        .route("/api/generate", post(generate::generate_video))
        .route("/videos/:name", get(videos::get_video))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Start the web UI and block until the server stops
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.work_dir)
        .await
        .with_context(|| format!("Failed to create work dir {}", config.work_dir.display()))?;

    let generator = TalkingHeadGenerator::from_config(&config)?;
    utility::log_diagnostics(&config, &generator);

    let addr = config.bind_address();
    let state = Arc::new(AppState::new(config, generator));
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Open http://{} in your browser", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
