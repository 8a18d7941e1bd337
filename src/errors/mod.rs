// Error handling module
// Contains the application error type and its mapping to HTTP responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Пользовательский ввод не прошел проверку (показывается как предупреждение)
    #[error("{0}")]
    Validation(String),

    #[error("Wav2Lip checkpoint not found at {0}. Please download wav2lip_gan.pth.")]
    CheckpointMissing(String),

    #[error("Failed to generate TTS audio: {0}")]
    Tts(String),

    #[error("Wav2Lip inference failed: {0}")]
    LipSyncFailed(String),

    #[error("Wav2Lip finished but no output video found.")]
    OutputMissing,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Other error: {0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl AppError {
    /// Уровень сообщения для интерфейса
    pub fn level(&self) -> MessageLevel {
        match self {
            AppError::Validation(_) => MessageLevel::Warning,
            _ => MessageLevel::Error,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::CheckpointMissing(_) | AppError::Configuration(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Tts(_) | AppError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Configuration(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Warning,
    Error,
}

/// Тело ответа со статусом, которое отображает страница
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: MessageLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.level() {
            MessageLevel::Warning => log::warn!("{}", self),
            _ => log::error!("{}", self),
        }
        let body = StatusMessage {
            status: self.level(),
            message: self.to_string(),
            video_url: None,
        };
        (self.status_code(), Json(body)).into_response()
    }
}

// Result type alias for application
pub type AppResult<T> = Result<T, AppError>;
