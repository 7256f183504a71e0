//! Whisper transcription using whisper-rs

use anyhow::{Context, Result};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::Settings;
use crate::transcription::TranscriptChunk;

/// Whisper-based transcriber
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    language: Option<String>,
    translate: bool,
    threads: u32,
}

impl WhisperTranscriber {
    /// Create a new transcriber with the configured model
    pub fn new(settings: &Settings) -> Result<Self> {
        let model_path = settings.whisper_model_path();

        if !model_path.exists() {
            anyhow::bail!(
                "Whisper model not found at {}. Download a ggml model (e.g. ggml-{}.bin) \
                 into the models directory first.",
                model_path.display(),
                settings.whisper.model
            );
        }

        let ctx = WhisperContext::new_with_params(
            model_path.to_str().unwrap(),
            WhisperContextParameters::default(),
        )
        .context("Failed to load Whisper model")?;

        let language = if settings.whisper.language.is_empty() {
            None
        } else {
            Some(settings.whisper.language.clone())
        };

        Ok(Self {
            ctx,
            language,
            translate: settings.whisper.translate,
            threads: settings.whisper.threads,
        })
    }

    /// Transcribe audio samples into timestamped chunks
    pub fn transcribe(&self, samples: &[f32]) -> Result<Vec<TranscriptChunk>> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        // Configure parameters
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_translate(self.translate);

        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        }

        if self.threads > 0 {
            params.set_n_threads(self.threads as i32);
        }

        // Run inference
        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create Whisper state")?;
        state
            .full(params, samples)
            .context("Whisper inference failed")?;

        // Extract segments
        let num_segments = state
            .full_n_segments()
            .context("Failed to get segment count")?;
        let mut chunks = Vec::new();

        for i in 0..num_segments {
            let start = state
                .full_get_segment_t0(i)
                .context("Failed to get segment start time")? as f64
                / 100.0; // Convert from centiseconds

            let end = state
                .full_get_segment_t1(i)
                .context("Failed to get segment end time")? as f64
                / 100.0;

            let text = state
                .full_get_segment_text(i)
                .context("Failed to get segment text")?;

            // Skip empty or whitespace-only segments
            let text = text.trim().to_string();
            if text.is_empty() {
                continue;
            }

            chunks.push(TranscriptChunk::new(start, end, text));
        }

        Ok(chunks)
    }
}
