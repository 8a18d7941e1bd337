// TTS services module
// Speech synthesis is delegated to external engines reached over HTTP

use std::path::Path;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::TtsOptions;

pub mod gtts;
pub mod openai;

pub use gtts::GoogleTts;
pub use openai::OpenAiTts;

#[cfg(test)]
mod tests;

/// Языки, которые предлагает интерфейс
const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("hi", "Hindi"),
    ("ja", "Japanese"),
    ("zh-CN", "Chinese (Mandarin)"),
];

/// Trait that all TTS services must implement
#[async_trait::async_trait]
pub trait TtsService: Send + Sync {
    /// Engine name, as used in the configuration
    fn name(&self) -> &'static str;

    /// Synthesize `text` into an MP3 buffer
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> AppResult<Vec<u8>>;

    /// Synthesize `text` and write the audio to `path`
    async fn synthesize_to_file(
        &self,
        text: &str,
        options: &TtsOptions,
        path: &Path,
    ) -> AppResult<()> {
        let audio = self.synthesize(text, options).await?;
        tokio::fs::write(path, &audio)
            .await
            .map_err(|e| AppError::Tts(format!("Failed to save audio to {}: {}", path.display(), e)))?;
        log::info!("Saved {} bytes of TTS audio to {}", audio.len(), path.display());
        Ok(())
    }
}

/// Get the appropriate TTS service based on the engine name
pub fn get_tts_service(engine: &str, config: &AppConfig) -> AppResult<Box<dyn TtsService>> {
    match engine {
        "gtts" => Ok(Box::new(GoogleTts::new(&config.tts_base_url)?)),
        "openai" => Ok(Box::new(OpenAiTts::new(
            &config.openai_base_url,
            &config.openai_api_key,
            &config.openai_model,
            &config.openai_voice,
        )?)),
        _ => Err(AppError::Configuration(format!("Unsupported TTS engine: {}", engine))),
    }
}

/// Get the list of available TTS engines
pub fn get_available_engines() -> Vec<&'static str> {
    vec!["gtts", "openai"]
}

/// Language codes with display names
pub fn available_languages() -> Vec<(&'static str, &'static str)> {
    LANGUAGES.to_vec()
}

pub fn is_supported_language(code: &str) -> bool {
    LANGUAGES.iter().any(|(c, _)| *c == code)
}
