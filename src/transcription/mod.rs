//! Transcription module for colloquy
//!
//! Handles speech-to-text using whisper-rs.

mod pipeline;
mod whisper;

pub use pipeline::TranscriptionPipeline;
pub use whisper::WhisperTranscriber;

use serde::{Deserialize, Serialize};

/// A timestamped fragment of transcribed speech
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptChunk {
    /// Start time in seconds from the beginning of the audio
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Transcribed text
    pub text: String,
}

impl TranscriptChunk {
    pub fn new(start: f64, end: f64, text: String) -> Self {
        Self { start, end, text }
    }
}
