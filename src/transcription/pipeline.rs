//! Transcription pipeline orchestration

use anyhow::Result;

use crate::audio::SAMPLE_RATE;
use crate::config::Settings;
use crate::transcription::whisper::WhisperTranscriber;
use crate::transcription::TranscriptChunk;

/// Transcription pipeline for processing decoded audio
pub struct TranscriptionPipeline {
    transcriber: WhisperTranscriber,
    window_duration_secs: f32,
}

impl TranscriptionPipeline {
    /// Create a new transcription pipeline
    pub fn new(settings: &Settings) -> Result<Self> {
        let transcriber = WhisperTranscriber::new(settings)?;

        Ok(Self {
            transcriber,
            window_duration_secs: 30.0, // Process in 30-second windows
        })
    }

    /// Transcribe decoded samples into timestamped chunks
    pub fn transcribe(&self, samples: &[f32]) -> Result<Vec<TranscriptChunk>> {
        let window_samples = (self.window_duration_secs * SAMPLE_RATE as f32) as usize;

        let mut all_chunks = Vec::new();
        let mut offset_time = 0.0;

        let windows: Vec<_> = samples.chunks(window_samples).collect();
        let total_windows = windows.len();

        for (i, window) in windows.iter().enumerate() {
            tracing::debug!("Transcribing window {}/{}", i + 1, total_windows);

            let mut chunks = self.transcriber.transcribe(window)?;

            // Adjust timestamps for window offset
            for chunk in &mut chunks {
                chunk.start += offset_time;
                chunk.end += offset_time;
            }

            all_chunks.extend(chunks);

            offset_time += window.len() as f64 / SAMPLE_RATE as f64;
        }

        // Stitch fragments split across window boundaries
        let merged = merge_chunks(all_chunks);

        tracing::info!("Transcription complete: {} chunks", merged.len());

        Ok(merged)
    }
}

/// Merge chunks that were split mid-sentence, typically at window boundaries.
///
/// A chunk is only absorbed into its predecessor when the gap is small and
/// the predecessor does not already end a sentence, so normal segment
/// granularity survives for speaker alignment.
fn merge_chunks(chunks: Vec<TranscriptChunk>) -> Vec<TranscriptChunk> {
    if chunks.is_empty() {
        return chunks;
    }

    let mut iter = chunks.into_iter();
    let mut merged = Vec::new();
    let mut current = iter.next().unwrap();

    for chunk in iter {
        let gap = chunk.start - current.end;

        if gap < 0.5 && !ends_sentence(&current.text) {
            current.end = chunk.end;
            current.text.push(' ');
            current.text.push_str(&chunk.text);
        } else {
            merged.push(current);
            current = chunk;
        }
    }

    merged.push(current);
    merged
}

fn ends_sentence(text: &str) -> bool {
    matches!(text.chars().last(), Some('.' | '!' | '?'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stitches_mid_sentence_fragments() {
        let chunks = vec![
            TranscriptChunk::new(0.0, 2.0, "We should move the".to_string()),
            TranscriptChunk::new(2.1, 4.0, "launch to Friday.".to_string()),
            TranscriptChunk::new(10.0, 12.0, "Agreed.".to_string()),
        ];

        let merged = merge_chunks(chunks);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "We should move the launch to Friday.");
        assert_eq!(merged[0].end, 4.0);
        assert_eq!(merged[1].text, "Agreed.");
    }

    #[test]
    fn complete_sentences_stay_separate() {
        let chunks = vec![
            TranscriptChunk::new(0.0, 2.0, "Morning everyone.".to_string()),
            TranscriptChunk::new(2.0, 4.0, "Let's get started.".to_string()),
        ];

        let merged = merge_chunks(chunks);

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(merge_chunks(Vec::new()).is_empty());
    }
}
