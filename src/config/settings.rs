//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperSettings,

    /// Speaker diarization settings
    #[serde(default)]
    pub diarization: DiarizationSettings,

    /// Summarization settings
    #[serde(default)]
    pub summary: SummarySettings,

    /// Web server settings
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for model files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSettings {
    /// Whisper model to use (tiny, base, small, medium, large)
    #[serde(default = "default_model")]
    pub model: String,

    /// Path to model files directory
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Language for transcription (empty = auto-detect)
    #[serde(default = "default_language")]
    pub language: String,

    /// Enable translation to English
    #[serde(default)]
    pub translate: bool,

    /// Number of threads for inference (0 = auto)
    #[serde(default)]
    pub threads: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationSettings {
    /// Whether diarization is offered at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Segmentation model filename under the models directory
    #[serde(default = "default_segmentation_model")]
    pub segmentation_model: String,

    /// Speaker embedding model filename under the models directory
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Default number of speakers offered in the form
    #[serde(default = "default_num_speakers")]
    pub default_speakers: usize,

    /// Maximum number of speakers selectable in the form
    #[serde(default = "default_max_speakers")]
    pub max_speakers: usize,

    /// Cosine similarity threshold for speaker clustering (0.0 to 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySettings {
    /// Summarizer provider (gemini)
    #[serde(default = "default_summary_provider")]
    pub provider: String,

    /// API key (for cloud providers)
    #[serde(default)]
    pub api_key: String,

    /// Path to a file holding the API key, read when `api_key` is empty
    #[serde(default)]
    pub api_key_file: String,

    /// Model name
    #[serde(default = "default_summary_model")]
    pub model: String,

    /// API endpoint (for custom deployments)
    #[serde(default)]
    pub endpoint: String,

    /// Approximate token budget per transcript chunk sent to the provider
    #[serde(default = "default_chunk_tokens")]
    pub chunk_tokens: usize,

    /// Character budget for the extractive fallback summary
    #[serde(default = "default_fallback_chars")]
    pub fallback_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address for the web UI
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the web UI
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum upload size in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "colloquy", "colloquy")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/colloquy"))
}

fn default_models_dir() -> PathBuf {
    let mut dir = default_data_dir();
    dir.push("models");
    dir
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_segmentation_model() -> String {
    "segmentation-3.0.onnx".to_string()
}

fn default_embedding_model() -> String {
    "wespeaker_en_voxceleb_CAM++.onnx".to_string()
}

fn default_num_speakers() -> usize {
    2
}

fn default_max_speakers() -> usize {
    10
}

fn default_similarity_threshold() -> f32 {
    0.5
}

fn default_summary_provider() -> String {
    "gemini".to_string()
}

fn default_summary_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_chunk_tokens() -> usize {
    800
}

fn default_fallback_chars() -> usize {
    1200
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_max_upload_mb() -> usize {
    64
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            models_dir: default_models_dir(),
            language: default_language(),
            translate: false,
            threads: 0,
        }
    }
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            segmentation_model: default_segmentation_model(),
            embedding_model: default_embedding_model(),
            default_speakers: default_num_speakers(),
            max_speakers: default_max_speakers(),
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            provider: default_summary_provider(),
            api_key: String::new(),
            api_key_file: String::new(),
            model: default_summary_model(),
            endpoint: String::new(),
            chunk_tokens: default_chunk_tokens(),
            fallback_chars: default_fallback_chars(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            whisper: WhisperSettings::default(),
            diarization: DiarizationSettings::default(),
            summary: SummarySettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.summary.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var("COLLOQUY_API_KEY") {
                if !key.trim().is_empty() {
                    self.summary.api_key = key;
                }
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "colloquy", "colloquy")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(&self.whisper.models_dir)?;
        Ok(())
    }

    /// Get the path to the whisper model file
    pub fn whisper_model_path(&self) -> PathBuf {
        self.whisper
            .models_dir
            .join(format!("ggml-{}.bin", self.whisper.model))
    }

    /// Get the path to the diarization segmentation model
    pub fn segmentation_model_path(&self) -> PathBuf {
        self.whisper.models_dir.join(&self.diarization.segmentation_model)
    }

    /// Get the path to the speaker embedding model
    pub fn embedding_model_path(&self) -> PathBuf {
        self.whisper.models_dir.join(&self.diarization.embedding_model)
    }

    /// Resolve the summarizer API key: config value first, then key file.
    ///
    /// Missing keys are not an error; the summarizer falls back to an
    /// extractive summary when no provider is available.
    pub fn resolve_api_key(&self) -> Option<String> {
        let key = self.summary.api_key.trim();
        if !key.is_empty() {
            return Some(key.to_string());
        }

        let key_file = self.summary.api_key_file.trim();
        if key_file.is_empty() {
            return None;
        }

        match std::fs::read_to_string(key_file) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) => {
                tracing::warn!("Unable to read API key file {}: {}", key_file, e);
                None
            }
        }
    }
}
