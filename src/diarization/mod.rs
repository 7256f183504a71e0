//! Speaker diarization module for colloquy
//!
//! Wraps the pyannote ONNX models (segmentation + speaker embeddings).

mod engine;

pub use engine::DiarizationEngine;

use serde::{Deserialize, Serialize};

/// Label given to speech that could not be attributed to a speaker
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// A span of audio attributed to one speaker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerSegment {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Display label (e.g. "Speaker 1")
    pub speaker: String,
}
