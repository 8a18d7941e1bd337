//! Common utility functions used across the application

use std::collections::VecDeque;
use std::path::Path;

/// Check if a file exists and has valid content (non-zero size)
pub async fn check_file_exists_and_valid(path: &Path) -> bool {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_file() && metadata.len() > 0 {
            return true;
        }
    }
    false
}

/// Longest line kept from process output, in bytes
const MAX_LINE_BYTES: usize = 1024;

/// Bounded tail of a process output stream.
/// `\r` also ends a line, since progress bars redraw with it.
#[derive(Debug)]
pub struct OutputTail {
    lines: VecDeque<String>,
    partial: Vec<u8>,
    max_lines: usize,
}

impl OutputTail {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines),
            partial: Vec::new(),
            max_lines,
        }
    }

    /// Feed raw bytes, returning the lines completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut completed = Vec::new();
        for &b in bytes {
            if b == b'\n' || b == b'\r' {
                self.finish_line(&mut completed);
            } else if self.partial.len() < MAX_LINE_BYTES {
                self.partial.push(b);
            }
        }
        completed
    }

    /// Flush an unterminated last line
    pub fn finish(&mut self) -> Vec<String> {
        let mut completed = Vec::new();
        self.finish_line(&mut completed);
        completed
    }

    pub fn joined(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    fn finish_line(&mut self, completed: &mut Vec<String>) {
        let line = String::from_utf8_lossy(&self.partial).trim().to_string();
        self.partial.clear();
        if line.is_empty() || self.max_lines == 0 {
            return;
        }
        if self.lines.len() == self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line.clone());
        completed.push(line);
    }
}
