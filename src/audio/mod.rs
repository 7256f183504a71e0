//! Audio decoding for colloquy
//!
//! Turns uploaded files into the 16 kHz mono f32 samples the model
//! pipelines expect.

mod decode;

pub use decode::{decode_file, decode_upload, decode_wav_bytes, is_supported_format, to_i16_samples};

/// Sample rate expected by both Whisper and the diarization models
pub const SAMPLE_RATE: u32 = 16_000;
