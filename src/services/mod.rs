// Services module
// External collaborators (TTS, Wav2Lip) and the generation pipeline built on them

pub mod lipsync;
pub mod pipeline;
pub mod tts;

#[cfg(test)]
pub(crate) mod testing;

pub use lipsync::LipSyncInvoker;
pub use pipeline::TalkingHeadGenerator;
