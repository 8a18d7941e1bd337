use std::time::Duration;

use reqwest::Client;
use serde::Serialize;

use super::TtsService;
use crate::errors::{AppError, AppResult};
use crate::models::TtsOptions;

/// Параметры запроса к API OpenAI TTS
#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
    response_format: &'a str,
}

/// Клиент для работы с OpenAI TTS API
pub struct OpenAiTts {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    voice: String,
}

impl OpenAiTts {
    pub fn new(base_url: &str, api_key: &str, model: &str, voice: &str) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "OpenAI API key is required for the openai TTS engine".to_string(),
            ));
        }
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            voice: voice.to_string(),
        })
    }
}

/// OpenAI has no language parameter; the slow flag maps onto `speed`
pub fn speed_for(options: &TtsOptions) -> f32 {
    if options.slow { 0.5 } else { 1.0 }
}

#[async_trait::async_trait]
impl TtsService for OpenAiTts {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, text: &str, options: &TtsOptions) -> AppResult<Vec<u8>> {
        log::info!(
            "Generating speech using OpenAI TTS (model={}, voice={})",
            self.model,
            self.voice
        );

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: speed_for(options),
            response_format: "mp3",
        };

        let response = self
            .client
            .post(format!("{}/v1/audio/speech", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Tts(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {}", e));
            log::error!("OpenAI TTS error (status {}): {}", status, error_text);
            return Err(AppError::Tts(format!("OpenAI returned status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Tts(format!("failed to read response: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::Tts("OpenAI returned empty audio".to_string()));
        }
        log::info!("Received {} bytes of audio from OpenAI TTS", bytes.len());
        Ok(bytes.to_vec())
    }
}
