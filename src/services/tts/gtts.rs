//! # Google Translate TTS
//!
//! Клиент того же эндпоинта, которым пользуется gTTS. Эндпоинт принимает
//! не больше 100 символов за запрос, поэтому текст режется на фрагменты,
//! а MP3-ответы склеиваются по порядку.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use super::TtsService;
use crate::errors::{AppError, AppResult};
use crate::models::TtsOptions;

/// Максимальная длина фрагмента для одного запроса
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

// Конец предложения или клаузы: знак препинания, за которым идет пробел или конец строки
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?;:,\x{2026}\x{3002}]+(\s+|$)").expect("valid regex"));

pub struct GoogleTts {
    client: Client,
    base_url: String,
}

impl GoogleTts {
    pub fn new(base_url: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        index: usize,
        total: usize,
        options: &TtsOptions,
    ) -> AppResult<Vec<u8>> {
        let speed = if options.slow { "0.3" } else { "1" };
        let idx = index.to_string();
        let total_str = total.to_string();
        let textlen = chunk.chars().count().to_string();

        log::debug!("Requesting TTS chunk {}/{}: '{}'", index + 1, total, chunk);
        let response = self
            .client
            .get(format!("{}/translate_tts", self.base_url))
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", options.language.as_str()),
                ("q", chunk),
                ("ttsspeed", speed),
                ("total", total_str.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Tts(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Google TTS error for chunk {} (status {}): {}", index, status, body);
            return Err(AppError::Tts(format!(
                "TTS service returned status {} for language '{}'",
                status, options.language
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Tts(format!("failed to read response: {}", e)))?;
        if bytes.is_empty() {
            return Err(AppError::Tts(format!("empty audio for chunk {}", index)));
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl TtsService for GoogleTts {
    fn name(&self) -> &'static str {
        "gtts"
    }

    async fn synthesize(&self, text: &str, options: &TtsOptions) -> AppResult<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(AppError::Tts("no text to speak".to_string()));
        }

        log::info!(
            "Synthesizing {} chunk(s) with Google TTS (lang={}, slow={})",
            chunks.len(),
            options.language,
            options.slow
        );

        // MP3-фреймы можно склеивать без перекодирования
        let mut audio = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let part = self.fetch_chunk(chunk, i, chunks.len(), options).await?;
            audio.extend_from_slice(&part);
        }
        Ok(audio)
    }
}

/// Разбить текст на фрагменты длиной не больше `max_chars` символов.
///
/// Сначала текст режется по концам предложений, затем слишком длинные
/// предложения режутся по пробелам, а слова длиннее лимита - посимвольно.
/// Соседние короткие фрагменты объединяются, пока влезают в лимит.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for m in SENTENCE_END.find_iter(&normalized) {
        pieces.push(&normalized[start..m.end()]);
        start = m.end();
    }
    if start < normalized.len() {
        pieces.push(&normalized[start..]);
    }

    let mut bounded = Vec::new();
    for piece in pieces {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if piece.chars().count() <= max_chars {
            bounded.push(piece.to_string());
        } else {
            bounded.extend(split_by_words(piece, max_chars));
        }
    }

    let mut chunks: Vec<String> = Vec::new();
    for piece in bounded {
        let piece_len = piece.chars().count();
        match chunks.last_mut() {
            Some(last) if last.chars().count() + 1 + piece_len <= max_chars => {
                last.push(' ');
                last.push_str(&piece);
            }
            Some(_) | None => chunks.push(piece),
        }
    }
    chunks
}

fn split_by_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split(' ') {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                chunks.push(part.iter().collect());
            }
            continue;
        }

        let current_len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if current_len + 1 + word_len <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            chunks.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
