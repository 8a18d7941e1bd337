//! Временные файлы одного запроса
//!
//! Каждый файл резервируется под уникальным именем `<prefix>_<6 hex>.<ext>`
//! и удаляется при выходе из области видимости, если не вызван `keep()`.

use std::path::{Path, PathBuf};

use crate::errors::AppResult;

/// Длина случайного суффикса в имени файла
pub const SUFFIX_LEN: usize = 6;

/// Сгенерировать имя вида `face_1a2b3c.png`
pub fn unique_name(prefix: &str, extension: &str) -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}.{}", prefix, &hex[..SUFFIX_LEN], extension)
}

/// Файл, который удаляется при уничтожении guard'а
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
    keep: bool,
}

impl TempFile {
    /// Зарезервировать имя в `dir`. Сам файл не создается.
    pub fn reserve(dir: &Path, prefix: &str, extension: &str) -> Self {
        Self {
            path: dir.join(unique_name(prefix, extension)),
            keep: false,
        }
    }

    /// Зарезервировать имя и сразу записать содержимое
    pub async fn with_contents(
        dir: &Path,
        prefix: &str,
        extension: &str,
        contents: &[u8],
    ) -> AppResult<Self> {
        let file = Self::reserve(dir, prefix, extension);
        file.write(contents).await?;
        Ok(file)
    }

    pub async fn write(&self, contents: &[u8]) -> AppResult<()> {
        tokio::fs::write(&self.path, contents).await?;
        log::debug!("Wrote {} bytes to {}", contents.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Отказаться от удаления и вернуть путь
    pub fn keep(mut self) -> PathBuf {
        self.keep = true;
        self.path.clone()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.keep || !self.path.exists() {
            return;
        }
        // Один небольшой файл на guard: синхронное удаление на воркере tokio допустимо,
        // а в Drop нельзя дождаться async-задачи
        match std::fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed temporary file {}", self.path.display()),
            Err(e) => log::warn!(
                "Failed to remove temporary file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
