//! Сценарий генерации: текст -> TTS -> Wav2Lip -> видео
//!
//! Все временные файлы запроса живут в guard'ах `TempFile`: изображение
//! лица и аудио удаляются на любом пути выхода, видео остается только
//! при успехе.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{FaceImage, GenerationResult, TtsOptions, ACCEPTED_IMAGE_EXTENSIONS};
use crate::services::lipsync::LipSyncInvoker;
use crate::services::tts::{self, TtsService};
use crate::utils::temp::TempFile;

pub const EMPTY_SCRIPT_WARNING: &str = "Please enter some text for the anchor to speak.";
pub const MISSING_IMAGE_WARNING: &str = "Please upload a face image.";

pub struct TalkingHeadGenerator {
    work_dir: PathBuf,
    tts: Arc<dyn TtsService>,
    lipsync: LipSyncInvoker,
    // Одна генерация за раз: inference занимает GPU/CPU целиком
    permit: Semaphore,
}

impl TalkingHeadGenerator {
    pub fn new(config: &AppConfig, tts: Arc<dyn TtsService>) -> Self {
        Self {
            work_dir: config.work_dir.clone(),
            tts,
            lipsync: LipSyncInvoker::new(config),
            permit: Semaphore::new(1),
        }
    }

    /// Build the generator with the TTS engine named in the configuration
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let service = tts::get_tts_service(&config.tts_engine, config)?;
        Ok(Self::new(config, Arc::from(service)))
    }

    pub fn tts_engine(&self) -> &'static str {
        self.tts.name()
    }

    pub fn lipsync(&self) -> &LipSyncInvoker {
        &self.lipsync
    }

    /// Synthesize audio only, for the in-browser preview
    pub async fn preview(&self, script: &str, options: &TtsOptions) -> AppResult<Vec<u8>> {
        validate_script(script)?;
        validate_language(options)?;
        log::info!("Generating audio preview ({} chars)", script.chars().count());
        self.tts.synthesize(script, options).await
    }

    pub async fn generate(
        &self,
        script: &str,
        face: &FaceImage,
        options: &TtsOptions,
    ) -> AppResult<GenerationResult> {
        validate_script(script)?;
        validate_face(face)?;
        validate_language(options)?;
        self.lipsync.check_checkpoint()?;

        let _permit = self
            .permit
            .acquire()
            .await
            .map_err(|e| AppError::Other(format!("generation queue closed: {}", e)))?;

        log::info!("Starting talking-head generation ({} chars)", script.chars().count());

        let face_file = TempFile::with_contents(&self.work_dir, "face", "png", &face.bytes).await?;
        let output_file = TempFile::reserve(&self.work_dir, "output", "mp4");
        let audio_file = TempFile::reserve(&self.work_dir, "temp", "wav");

        self.tts
            .synthesize_to_file(script, options, audio_file.path())
            .await?;

        let result = self
            .lipsync
            .run(face_file.path(), audio_file.path(), output_file.path())
            .await;
        drop(audio_file);
        result?;

        let video_path = output_file.keep();
        let file_name = video_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::Other("output path has no file name".to_string()))?;

        log::info!("Video generated successfully: {}", video_path.display());
        Ok(GenerationResult {
            video_path,
            file_name,
        })
    }
}

fn validate_script(script: &str) -> AppResult<()> {
    if script.trim().is_empty() {
        return Err(AppError::Validation(EMPTY_SCRIPT_WARNING.to_string()));
    }
    Ok(())
}

fn validate_face(face: &FaceImage) -> AppResult<()> {
    if face.is_empty() {
        return Err(AppError::Validation(MISSING_IMAGE_WARNING.to_string()));
    }
    if !face.has_accepted_extension() {
        return Err(AppError::Validation(format!(
            "Unsupported image type. Please upload one of: {}.",
            ACCEPTED_IMAGE_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

fn validate_language(options: &TtsOptions) -> AppResult<()> {
    if !tts::is_supported_language(&options.language) {
        return Err(AppError::Validation(format!(
            "Unsupported language: {}",
            options.language
        )));
    }
    Ok(())
}
