//! Talking-head news anchor: a browser form around two external tools.
//!
//! A script is turned into speech by an HTTP TTS service, then Wav2Lip's
//! `inference.py` lip-syncs an uploaded face photo to that audio. The crate
//! only collects input, manages the per-request temporary files, runs the
//! two tools in order and serves the result back to the browser.

pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use services::TalkingHeadGenerator;
