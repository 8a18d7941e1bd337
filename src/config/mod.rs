// Configuration module
// Centralized management of application configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Переменная окружения с путем к JSON-файлу конфигурации
pub const CONFIG_ENV: &str = "ANCHOR_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Директория для временных файлов и готовых видео
    pub work_dir: PathBuf,
    /// Где лежит клон Wav2Lip
    pub wav2lip_dir: PathBuf,
    pub checkpoint_path: PathBuf,
    pub python: String,
    pub tts_engine: String,
    pub tts_base_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_voice: String,
    pub default_language: String,
    /// None - ждать завершения inference без ограничения
    pub lipsync_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let wav2lip_dir = PathBuf::from("Wav2Lip");
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            work_dir: PathBuf::from("."),
            checkpoint_path: wav2lip_dir.join("checkpoints").join("wav2lip_gan.pth"),
            wav2lip_dir,
            python: "python".to_string(),
            tts_engine: "gtts".to_string(),
            tts_base_url: "https://translate.google.com".to_string(),
            openai_api_key: String::new(),
            openai_base_url: "https://api.openai.com".to_string(),
            openai_model: "tts-1".to_string(),
            openai_voice: "alloy".to_string(),
            default_language: "en".to_string(),
            lipsync_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the optional JSON file, then environment overrides
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let env_path = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        let config: AppConfig = serde_json::from_str(&content)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Применяет переопределения из окружения. `lookup` подменяется в тестах.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ANCHOR_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("ANCHOR_PORT") {
            self.port = port
                .parse()
                .map_err(|_| AppError::Configuration(format!("Invalid ANCHOR_PORT: {}", port)))?;
        }
        if let Some(dir) = lookup("ANCHOR_WORK_DIR") {
            self.work_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("WAV2LIP_DIR") {
            let dir = PathBuf::from(dir);
            // Чекпоинт по умолчанию следует за директорией Wav2Lip
            if self.checkpoint_path == self.wav2lip_dir.join("checkpoints").join("wav2lip_gan.pth") {
                self.checkpoint_path = dir.join("checkpoints").join("wav2lip_gan.pth");
            }
            self.wav2lip_dir = dir;
        }
        if let Some(path) = lookup("WAV2LIP_CHECKPOINT") {
            self.checkpoint_path = PathBuf::from(path);
        }
        if let Some(python) = lookup("ANCHOR_PYTHON") {
            self.python = python;
        }
        if let Some(engine) = lookup("ANCHOR_TTS_ENGINE") {
            self.tts_engine = engine;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = key;
        }
        if let Some(timeout) = lookup("ANCHOR_LIPSYNC_TIMEOUT") {
            let secs = timeout.parse().map_err(|_| {
                AppError::Configuration(format!("Invalid ANCHOR_LIPSYNC_TIMEOUT: {}", timeout))
            })?;
            self.lipsync_timeout_secs = Some(secs).filter(|s| *s > 0);
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::Configuration("port must be non-zero".to_string()));
        }
        if !crate::services::tts::get_available_engines().contains(&self.tts_engine.as_str()) {
            return Err(AppError::Configuration(format!(
                "Unsupported TTS engine: {}",
                self.tts_engine
            )));
        }
        Ok(())
    }

    pub fn inference_script(&self) -> PathBuf {
        self.wav2lip_dir.join("inference.py")
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
