//! colloquy - Speech-to-text with speaker diarization and conversation summaries
//!
//! A "colloquy" is a conversation; this tool tells you who said what in one.

pub mod audio;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod diarization;
pub mod pipeline;
pub mod summary;
pub mod transcription;
pub mod web;

use thiserror::Error;

/// Main error type for colloquy
#[derive(Error, Debug)]
pub enum ColloquyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Diarization error: {0}")]
    Diarization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ColloquyError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "colloquy";
