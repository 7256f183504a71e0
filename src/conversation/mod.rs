//! Conversation building for colloquy
//!
//! Zips timestamped transcript chunks with diarization segments into
//! speaker-attributed turns and renders them as plain text.

use serde::{Deserialize, Serialize};

use crate::diarization::{SpeakerSegment, UNKNOWN_SPEAKER};
use crate::transcription::TranscriptChunk;

/// Label used when diarization is disabled and everything is one voice
pub const SINGLE_SPEAKER: &str = "Speaker";

/// One speaker-attributed turn of the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,

    /// Speaker label
    pub speaker: String,

    /// What was said
    pub text: String,
}

/// Attribute each transcript chunk to a speaker.
///
/// A chunk belongs to the first diarization segment whose interval contains
/// the chunk's start time. Overlapping segments are not resolved; chunks
/// outside every segment get the unknown label.
pub fn align_with_speakers(
    chunks: &[TranscriptChunk],
    segments: &[SpeakerSegment],
) -> Vec<Turn> {
    let mut aligned = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        let speaker = segments
            .iter()
            .find(|segment| segment.start <= chunk.start && chunk.start <= segment.end)
            .map(|segment| segment.speaker.clone())
            .unwrap_or_else(|| UNKNOWN_SPEAKER.to_string());

        aligned.push(Turn {
            start: chunk.start,
            end: chunk.end,
            speaker,
            text: chunk.text.clone(),
        });
    }

    aligned
}

/// Attribute every chunk to a single generic speaker.
///
/// Used when diarization is disabled or produced nothing.
pub fn single_speaker(chunks: &[TranscriptChunk]) -> Vec<Turn> {
    chunks
        .iter()
        .map(|chunk| Turn {
            start: chunk.start,
            end: chunk.end,
            speaker: SINGLE_SPEAKER.to_string(),
            text: chunk.text.clone(),
        })
        .collect()
}

/// Render turns as a human-readable conversation, one line per turn.
pub fn format_conversation(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.speaker, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start: f64, end: f64, text: &str) -> TranscriptChunk {
        TranscriptChunk::new(start, end, text.to_string())
    }

    fn segment(start: f64, end: f64, speaker: &str) -> SpeakerSegment {
        SpeakerSegment {
            start,
            end,
            speaker: speaker.to_string(),
        }
    }

    #[test]
    fn chunk_takes_speaker_of_containing_segment() {
        let chunks = vec![chunk(1.0, 3.0, "Hello"), chunk(5.0, 7.0, "Hi there")];
        let segments = vec![segment(0.0, 4.0, "Speaker 1"), segment(4.0, 8.0, "Speaker 2")];

        let turns = align_with_speakers(&chunks, &segments);

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker, "Speaker 1");
        assert_eq!(turns[1].speaker, "Speaker 2");
    }

    #[test]
    fn unmatched_chunk_is_unknown() {
        let chunks = vec![chunk(10.0, 12.0, "Anyone there?")];
        let segments = vec![segment(0.0, 4.0, "Speaker 1")];

        let turns = align_with_speakers(&chunks, &segments);

        assert_eq!(turns[0].speaker, UNKNOWN_SPEAKER);
    }

    #[test]
    fn no_segments_means_everything_unknown() {
        let chunks = vec![chunk(0.0, 2.0, "Hello")];

        let turns = align_with_speakers(&chunks, &[]);

        assert_eq!(turns[0].speaker, UNKNOWN_SPEAKER);
    }

    #[test]
    fn overlapping_segments_resolve_to_first_match() {
        let chunks = vec![chunk(2.0, 3.0, "Talking over each other")];
        let segments = vec![segment(0.0, 4.0, "Speaker 1"), segment(1.0, 5.0, "Speaker 2")];

        let turns = align_with_speakers(&chunks, &segments);

        assert_eq!(turns[0].speaker, "Speaker 1");
    }

    #[test]
    fn segment_boundaries_are_inclusive() {
        let chunks = vec![chunk(4.0, 6.0, "Right on the edge")];
        let segments = vec![segment(0.0, 4.0, "Speaker 1")];

        let turns = align_with_speakers(&chunks, &segments);

        assert_eq!(turns[0].speaker, "Speaker 1");
    }

    #[test]
    fn single_speaker_attributes_everything() {
        let chunks = vec![chunk(0.0, 2.0, "Note to self"), chunk(2.0, 4.0, "buy milk")];

        let turns = single_speaker(&chunks);

        assert!(turns.iter().all(|t| t.speaker == SINGLE_SPEAKER));
        assert_eq!(turns.len(), 2);
    }

    #[test]
    fn formats_one_line_per_turn() {
        let turns = vec![
            Turn {
                start: 0.0,
                end: 2.0,
                speaker: "Speaker 1".to_string(),
                text: "Hello".to_string(),
            },
            Turn {
                start: 2.0,
                end: 4.0,
                speaker: "Speaker 2".to_string(),
                text: "Hi".to_string(),
            },
        ];

        assert_eq!(format_conversation(&turns), "Speaker 1: Hello\nSpeaker 2: Hi");
    }

    #[test]
    fn empty_conversation_formats_empty() {
        assert_eq!(format_conversation(&[]), "");
    }
}
