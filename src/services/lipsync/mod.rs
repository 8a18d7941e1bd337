//! Запуск Wav2Lip `inference.py` как внешнего процесса
//!
//! Успех определяется двумя условиями: процесс завершился с кодом 0 и по
//! ожидаемому пути появился непустой файл. Wav2Lip может завершиться
//! успешно, ничего не записав.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::{ChildStderr, Command};

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::utils::common::{check_file_exists_and_valid, OutputTail};


/// Сколько последних строк stderr попадает в сообщение об ошибке
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct LipSyncInvoker {
    python: String,
    inference_script: PathBuf,
    checkpoint_path: PathBuf,
    timeout: Option<Duration>,
}

impl LipSyncInvoker {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            python: config.python.clone(),
            inference_script: config.inference_script(),
            checkpoint_path: config.checkpoint_path.clone(),
            timeout: config.lipsync_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    /// Checkpoint must exist before any TTS work is started
    pub fn check_checkpoint(&self) -> AppResult<()> {
        if self.checkpoint_path.is_file() {
            Ok(())
        } else {
            Err(AppError::CheckpointMissing(
                self.checkpoint_path.display().to_string(),
            ))
        }
    }

    /// Resolve the interpreter on PATH (or as given), for diagnostics
    pub fn check_python(&self) -> Option<PathBuf> {
        which::which(&self.python).ok()
    }

    /// Аргументы интерпретатора: скрипт и флаги Wav2Lip
    pub fn build_args(&self, face: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
        vec![
            self.inference_script.clone().into_os_string(),
            "--checkpoint_path".into(),
            self.checkpoint_path.clone().into_os_string(),
            "--face".into(),
            face.as_os_str().to_os_string(),
            "--audio".into(),
            audio.as_os_str().to_os_string(),
            "--outfile".into(),
            output.as_os_str().to_os_string(),
            "--static".into(),
            "True".into(),
        ]
    }

    /// Run inference to completion and check for the output file
    pub async fn run(&self, face: &Path, audio: &Path, output: &Path) -> AppResult<PathBuf> {
        self.check_checkpoint()?;

        let args = self.build_args(face, audio, output);
        log::info!(
            "Running Wav2Lip: {} {}",
            self.python,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let mut child = Command::new(&self.python)
            .args(&args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::LipSyncFailed(format!("failed to start {}: {}", self.python, e))
            })?;

        let stderr_reader = tokio::spawn(forward_stderr(child.stderr.take()));

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    if let Err(e) = child.kill().await {
                        log::warn!("Failed to kill Wav2Lip after timeout: {}", e);
                    }
                    stderr_reader.abort();
                    return Err(AppError::LipSyncFailed(format!(
                        "timed out after {}s",
                        limit.as_secs()
                    )));
                }
            },
            None => child.wait().await?,
        };
        let stderr = stderr_reader.await.unwrap_or_default();

        if !status.success() {
            log::error!("Wav2Lip exited with {}: {}", status, stderr);
            let mut message = format!("process exited with {}", status);
            if !stderr.is_empty() {
                message.push_str(": ");
                message.push_str(&stderr);
            }
            return Err(AppError::LipSyncFailed(message));
        }

        if !check_file_exists_and_valid(output).await {
            log::error!(
                "Wav2Lip exited successfully but {} is missing",
                output.display()
            );
            return Err(AppError::OutputMissing);
        }

        log::info!("Wav2Lip produced {}", output.display());
        Ok(output.to_path_buf())
    }
}

/// Пересылает stderr Wav2Lip (в том числе прогресс tqdm) в лог и
/// возвращает последние строки для сообщения об ошибке
async fn forward_stderr(stderr: Option<ChildStderr>) -> String {
    let Some(mut stderr) = stderr else {
        return String::new();
    };
    let mut tail = OutputTail::new(STDERR_TAIL_LINES);
    let mut buf = [0u8; 4096];
    loop {
        match stderr.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                for line in tail.push(&buf[..n]) {
                    log::info!("wav2lip: {}", line);
                }
            }
            Err(e) => {
                log::warn!("Failed to read Wav2Lip stderr: {}", e);
                break;
            }
        }
    }
    for line in tail.finish() {
        log::info!("wav2lip: {}", line);
    }
    tail.joined()
}
