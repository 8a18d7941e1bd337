// Domain models module
// Contains the request/response data structures shared by the pipeline and the HTTP layer

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Расширения, которые принимает загрузчик изображений
pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub const DEFAULT_SCRIPT: &str = "Hello, I'm your AI News Anchor. Welcome to today's program!";

/// Параметры синтеза речи
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TtsOptions {
    /// Код языка, например `en`
    #[serde(default = "default_language")]
    pub language: String,

    /// Медленная речь
    #[serde(default)]
    pub slow: bool,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            language: default_language(),
            slow: false,
        }
    }
}

/// Загруженное пользователем изображение лица
#[derive(Debug, Clone, Default)]
pub struct FaceImage {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl FaceImage {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A missing file name is accepted; a present one must carry an image extension
    pub fn has_accepted_extension(&self) -> bool {
        let Some(name) = self.file_name.as_deref().filter(|n| !n.is_empty()) else {
            return true;
        };
        name.rsplit_once('.')
            .map(|(_, ext)| {
                let ext = ext.to_ascii_lowercase();
                ACCEPTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }
}

/// Результат генерации видео
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    /// Путь к готовому видео
    pub video_path: PathBuf,
    /// Имя файла для ссылки `/videos/{name}`
    pub file_name: String,
}
