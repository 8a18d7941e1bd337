use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use super::AppState;
use crate::errors::{AppError, AppResult, MessageLevel, StatusMessage};
use crate::models::{FaceImage, TtsOptions};

/// Поля формы, как их отправляет страница
#[derive(Debug, Default)]
pub struct GenerateForm {
    pub script: String,
    pub face: FaceImage,
    pub language: Option<String>,
    pub slow: bool,
}

impl GenerateForm {
    pub fn tts_options(&self, default_language: &str) -> TtsOptions {
        let language = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(default_language);
        TtsOptions {
            language: language.to_string(),
            slow: self.slow,
        }
    }
}

fn form_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid form data: {}", e))
}

pub async fn read_form(mut multipart: Multipart) -> AppResult<GenerateForm> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "script" => form.script = field.text().await.map_err(form_error)?,
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(form_error)?;
                form.face = FaceImage::new(file_name, bytes.to_vec());
            }
            "language" => form.language = Some(field.text().await.map_err(form_error)?),
            "slow" => {
                let value = field.text().await.map_err(form_error)?;
                form.slow = matches!(value.trim(), "on" | "true" | "1");
            }
            other => log::debug!("Ignoring unknown form field '{}'", other),
        }
    }

    Ok(form)
}

/// POST /api/generate
pub async fn generate_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<StatusMessage>> {
    let form = read_form(multipart).await?;
    let options = form.tts_options(&state.config.default_language);

    let result = state
        .generator
        .generate(&form.script, &form.face, &options)
        .await?;

    Ok(Json(StatusMessage {
        status: MessageLevel::Success,
        message: "Video generated successfully!".to_string(),
        video_url: Some(format!("/videos/{}", result.file_name)),
    }))
}

/// POST /api/preview
pub async fn preview_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;
    let options = form.tts_options(&state.config.default_language);

    let audio = state.generator.preview(&form.script, &options).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}
