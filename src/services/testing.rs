//! Test doubles shared by the service tests

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::models::TtsOptions;
use crate::services::tts::TtsService;

/// Пишет в `--outfile` и завершается успешно
pub const WRITES_OUTPUT: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--outfile" ]; then out="$2"; fi
  shift
done
printf 'fake mp4' > "$out"
"#;

pub const FAILS: &str = r#"
echo "loading checkpoint" >&2
echo "RuntimeError: CUDA out of memory" >&2
exit 3
"#;

/// Начинает писать видео и падает посередине
pub const WRITES_PARTIAL_THEN_FAILS: &str = r#"
out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--outfile" ]; then out="$2"; fi
  shift
done
printf 'half an mp4' > "$out"
echo "ffmpeg: broken pipe" >&2
exit 1
"#;

/// Много строк прогресса в stderr, затем ошибка
pub const NOISY_FAILS: &str = r#"
i=1
while [ $i -le 40 ]; do
  echo "frame $i/40" >&2
  i=$((i + 1))
done
echo "ValueError: Face not detected!" >&2
exit 1
"#;

pub const EXITS_WITHOUT_OUTPUT: &str = "exit 0\n";

pub const SLEEPS: &str = "sleep 5\n";

/// Собрать конфигурацию с поддельным Wav2Lip в `root`:
/// `inference.py` - это shell-скрипт, а интерпретатор - `sh`.
pub fn fake_wav2lip(root: &Path, script: &str, with_checkpoint: bool) -> AppConfig {
    let wav2lip_dir = root.join("Wav2Lip");
    let checkpoints = wav2lip_dir.join("checkpoints");
    std::fs::create_dir_all(&checkpoints).unwrap();
    std::fs::write(wav2lip_dir.join("inference.py"), script).unwrap();

    let checkpoint_path = checkpoints.join("wav2lip_gan.pth");
    if with_checkpoint {
        std::fs::write(&checkpoint_path, b"weights").unwrap();
    }

    let work_dir = root.join("work");
    std::fs::create_dir_all(&work_dir).unwrap();

    AppConfig {
        work_dir,
        wav2lip_dir,
        checkpoint_path,
        python: "sh".to_string(),
        ..AppConfig::default()
    }
}

/// TTS, который ничего не синтезирует, а считает вызовы
#[derive(Default, Clone)]
pub struct FakeTts {
    pub calls: Arc<AtomicUsize>,
    pub fail: bool,
}

impl FakeTts {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TtsService for FakeTts {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn synthesize(&self, text: &str, options: &TtsOptions) -> AppResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::Tts("service unavailable".to_string()));
        }
        Ok(format!("{}:{}", options.language, text).into_bytes())
    }
}

/// Имена файлов в директории, отсортированные
pub fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
