//! Diarization engine using pyannote-rs
//!
//! Runs segmentation to find speech regions, then clusters per-segment
//! speaker embeddings into at most the requested number of speakers.
//! All speaker state is scoped to a single engine instance; nothing is
//! persisted between requests.

use std::collections::HashMap;
use std::path::PathBuf;

use pyannote_rs::{EmbeddingExtractor, EmbeddingManager, get_segments};

use crate::audio::{to_i16_samples, SAMPLE_RATE};
use crate::config::Settings;
use crate::diarization::{SpeakerSegment, UNKNOWN_SPEAKER};
use crate::{ColloquyError, Result};

/// Diarization engine that identifies speakers in decoded audio
pub struct DiarizationEngine {
    segmentation_model_path: PathBuf,
    embedding_extractor: EmbeddingExtractor,
    embedding_manager: EmbeddingManager,
    similarity_threshold: f32,
    speaker_labels: HashMap<usize, String>,
}

impl DiarizationEngine {
    /// Create an engine clustering into at most `num_speakers` speakers.
    ///
    /// Engines are cheap enough to build per request, which is how the web
    /// form uses them since the speaker count is a form input.
    pub fn new(settings: &Settings, num_speakers: usize) -> Result<Self> {
        let segmentation_model_path = settings.segmentation_model_path();
        let embedding_model_path = settings.embedding_model_path();

        if !segmentation_model_path.exists() {
            return Err(ColloquyError::Diarization(format!(
                "Segmentation model not found at {}",
                segmentation_model_path.display()
            )));
        }
        if !embedding_model_path.exists() {
            return Err(ColloquyError::Diarization(format!(
                "Speaker embedding model not found at {}",
                embedding_model_path.display()
            )));
        }

        // pyannote-rs reports errors through eyre
        let embedding_extractor = EmbeddingExtractor::new(&embedding_model_path)
            .map_err(|e| {
                ColloquyError::Diarization(format!("Failed to load embedding model: {}", e))
            })?;

        let embedding_manager = EmbeddingManager::new(num_speakers.max(1));

        Ok(Self {
            segmentation_model_path,
            embedding_extractor,
            embedding_manager,
            similarity_threshold: settings.diarization.similarity_threshold,
            speaker_labels: HashMap::new(),
        })
    }

    /// Run diarization on 16 kHz mono samples and return speaker segments.
    pub fn diarize(&mut self, samples: &[f32]) -> Result<Vec<SpeakerSegment>> {
        tracing::info!("Running diarization on {} samples", samples.len());

        // The pyannote models take i16 samples
        let samples_i16 = to_i16_samples(samples);

        let segments_iter = get_segments(&samples_i16, SAMPLE_RATE, &self.segmentation_model_path)
            .map_err(|e| {
                ColloquyError::Diarization(format!("Segmentation failed: {}", e))
            })?;

        let mut speaker_segments = Vec::new();

        for segment_result in segments_iter {
            let segment = match segment_result {
                Ok(seg) => seg,
                Err(e) => {
                    tracing::warn!("Skipping unreadable speech segment: {}", e);
                    continue;
                }
            };

            let embedding: Vec<f32> = match self.embedding_extractor.compute(&segment.samples) {
                Ok(iter) => iter.collect(),
                Err(e) => {
                    tracing::warn!(
                        "Skipping segment at {:.1}s, embedding failed: {}",
                        segment.start,
                        e
                    );
                    continue;
                }
            };

            let speaker = self.label_for(embedding);

            speaker_segments.push(SpeakerSegment {
                start: segment.start,
                end: segment.end,
                speaker,
            });
        }

        tracing::info!(
            "Diarization complete: {} segments, {} speakers",
            speaker_segments.len(),
            self.speaker_labels.len()
        );

        Ok(speaker_segments)
    }

    /// Match an embedding to a session speaker, creating one if capacity allows.
    fn label_for(&mut self, embedding: Vec<f32>) -> String {
        match self
            .embedding_manager
            .search_speaker(embedding, self.similarity_threshold)
        {
            Some(speaker_idx) => self
                .speaker_labels
                .entry(speaker_idx)
                .or_insert_with(|| format!("Speaker {}", speaker_idx + 1))
                .clone(),
            None => {
                // Speaker cap reached and nothing matched the threshold
                UNKNOWN_SPEAKER.to_string()
            }
        }
    }
}
