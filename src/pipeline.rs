//! End-to-end processing pipeline
//!
//! Runs diarization, transcription, alignment, and summarization for one
//! audio file. Diarization and summarization are best-effort: their failures
//! are recorded as notes and the pipeline continues. Transcription is the
//! only fatal step.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Mutex;

use crate::config::Settings;
use crate::conversation::{self, Turn};
use crate::diarization::{DiarizationEngine, SpeakerSegment};
use crate::summary::{self, SummarySource};
use crate::transcription::TranscriptionPipeline;

/// One processing request, already decoded to 16 kHz mono samples
pub struct ProcessRequest {
    pub samples: Vec<f32>,
    pub num_speakers: usize,
    pub diarize: bool,
}

/// Everything a finished run produces
pub struct ProcessOutcome {
    pub turns: Vec<Turn>,
    pub conversation: String,
    pub summary: String,
    pub summary_source: SummarySource,
    /// Steps that degraded or were skipped
    pub notes: Vec<String>,
}

/// Shared processor behind the web UI and the CLI.
///
/// Holds the only process-wide model handle: the Whisper pipeline, loaded on
/// first use and reused for the life of the process. Diarization engines are
/// built per request because the speaker count is a per-request input.
pub struct Processor {
    settings: Settings,
    transcription: Mutex<Option<Arc<TranscriptionPipeline>>>,
}

impl Processor {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            transcription: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process one audio file end to end.
    pub async fn process(&self, request: ProcessRequest) -> Result<ProcessOutcome> {
        let mut notes = Vec::new();

        if request.samples.is_empty() {
            anyhow::bail!("Audio contained no samples");
        }

        let segments = if request.diarize {
            match self.diarize(&request.samples, request.num_speakers) {
                Ok(segments) => segments,
                Err(e) => {
                    tracing::warn!("Diarization failed: {}", e);
                    notes.push(format!("Diarization failed: {}", e));
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        let pipeline = self.transcription().await?;
        let chunks = pipeline
            .transcribe(&request.samples)
            .context("Transcription failed")?;

        let turns = if segments.is_empty() {
            conversation::single_speaker(&chunks)
        } else {
            conversation::align_with_speakers(&chunks, &segments)
        };
        let conversation_text = conversation::format_conversation(&turns);

        let summary_outcome =
            summary::summarize_conversation(&self.settings, &conversation_text).await;
        if let Some(note) = summary_outcome.note {
            notes.push(note);
        }

        Ok(ProcessOutcome {
            turns,
            conversation: conversation_text,
            summary: summary_outcome.text,
            summary_source: summary_outcome.source,
            notes,
        })
    }

    fn diarize(&self, samples: &[f32], num_speakers: usize) -> crate::Result<Vec<SpeakerSegment>> {
        let mut engine = DiarizationEngine::new(&self.settings, num_speakers)?;
        engine.diarize(samples)
    }

    /// Get the shared transcription pipeline, loading the model on first use.
    async fn transcription(&self) -> Result<Arc<TranscriptionPipeline>> {
        let mut guard = self.transcription.lock().await;

        if let Some(pipeline) = guard.as_ref() {
            return Ok(Arc::clone(pipeline));
        }

        tracing::info!("Loading Whisper model ({})", self.settings.whisper.model);
        let pipeline = Arc::new(TranscriptionPipeline::new(&self.settings)?);
        *guard = Some(Arc::clone(&pipeline));

        Ok(pipeline)
    }
}
