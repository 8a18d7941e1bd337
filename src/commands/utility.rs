use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;
use crate::config::AppConfig;
use crate::services::{tts, TalkingHeadGenerator};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tts_engine: String,
    pub checkpoint_present: bool,
    pub python: Option<String>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let lipsync = state.generator.lipsync();
    let checkpoint_present = lipsync.check_checkpoint().is_ok();
    let python = lipsync.check_python().map(|p| p.display().to_string());
    let status = if checkpoint_present && python.is_some() {
        "ready"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tts_engine: state.generator.tts_engine().to_string(),
        checkpoint_present,
        python,
        started_at: state.started_at,
    })
}

/// GET /api/languages
pub async fn languages(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let options: Vec<LanguageOption> = tts::available_languages()
        .into_iter()
        .map(|(code, name)| LanguageOption { code, name })
        .collect();
    Json(serde_json::json!({
        "default": state.config.default_language,
        "languages": options,
    }))
}

/// Сообщить при старте, чего не хватает для генерации
pub fn log_diagnostics(config: &AppConfig, generator: &TalkingHeadGenerator) {
    log::info!("TTS engine: {}", generator.tts_engine());
    log::info!("Work directory: {}", config.work_dir.display());

    let lipsync = generator.lipsync();
    match lipsync.check_checkpoint() {
        Ok(()) => log::info!("Wav2Lip checkpoint: {}", lipsync.checkpoint_path().display()),
        Err(e) => log::warn!("{}", e),
    }
    match lipsync.check_python() {
        Some(path) => log::info!("Python interpreter: {}", path.display()),
        None => log::warn!("Python interpreter '{}' not found in PATH", config.python),
    }
    if !config.inference_script().is_file() {
        log::warn!(
            "Wav2Lip inference script not found at {}",
            config.inference_script().display()
        );
    }
}
