//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::audio;
use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::pipeline::{ProcessRequest, Processor};
use crate::summary::SummarySource;

/// Launch the web UI
pub async fn serve(settings: &Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut settings = settings.clone();

    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    settings.ensure_dirs()?;

    crate::web::serve(settings).await
}

/// Process a single audio file and write the text outputs next to it
pub async fn process_file(
    settings: &Settings,
    input: &Path,
    speakers: Option<usize>,
    no_diarization: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let num_speakers = speakers
        .unwrap_or(settings.diarization.default_speakers)
        .clamp(1, settings.diarization.max_speakers);
    let diarize = !no_diarization && settings.diarization.enabled;

    tracing::info!("Decoding {}", input.display());
    let samples = audio::decode_file(input)?;

    let processor = Processor::new(settings.clone());
    let outcome = processor
        .process(ProcessRequest {
            samples,
            num_speakers,
            diarize,
        })
        .await?;

    for note in &outcome.notes {
        eprintln!("warning: {}", note);
    }

    let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let conversation_path = output_dir.join("conversation.txt");
    std::fs::write(&conversation_path, &outcome.conversation)
        .with_context(|| format!("Failed to write {}", conversation_path.display()))?;
    println!("Conversation saved to {}", conversation_path.display());

    if !outcome.summary.is_empty() {
        let summary_path = output_dir.join("summary.txt");
        std::fs::write(&summary_path, &outcome.summary)
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;
        println!("Summary saved to {}", summary_path.display());

        let heading = match outcome.summary_source {
            SummarySource::Provider => "Summary:",
            SummarySource::Extractive => "Summary (extract):",
        };
        println!();
        println!("{}", heading);
        println!("{}", outcome.summary);
    } else {
        println!("No summary available.");
    }

    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct DoctorReport {
    checks: Vec<DoctorCheck>,
    notes: Vec<String>,
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("colloquy doctor");
    println!();

    for check in &report.checks {
        println!("{:<18} {:<8} {}", check.name, check.status, check.detail);
    }

    if !report.notes.is_empty() {
        println!();
        for note in &report.notes {
            println!("{}", note);
        }
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let mut checks = Vec::new();
    let mut notes = Vec::new();

    let whisper_model = settings.whisper_model_path();
    checks.push(file_check("whisper model", &whisper_model));
    if !whisper_model.exists() {
        notes.push(format!(
            "hint: download a ggml whisper model to {}",
            whisper_model.display()
        ));
    }

    let segmentation_model = settings.segmentation_model_path();
    checks.push(file_check("segmentation model", &segmentation_model));

    let embedding_model = settings.embedding_model_path();
    checks.push(file_check("embedding model", &embedding_model));

    if !segmentation_model.exists() || !embedding_model.exists() {
        notes.push(
            "hint: diarization needs the pyannote segmentation and speaker embedding \
             ONNX models in the models directory."
                .to_string(),
        );
    }

    let ffmpeg_ok = command_exists("ffmpeg");
    checks.push(DoctorCheck {
        name: "ffmpeg",
        status: if ffmpeg_ok { "ok" } else { "missing" },
        detail: "required for non-WAV uploads".to_string(),
    });

    let api_key_ok = settings.resolve_api_key().is_some();
    checks.push(DoctorCheck {
        name: "summarizer key",
        status: if api_key_ok { "ok" } else { "missing" },
        detail: "without it summaries fall back to extracts".to_string(),
    });

    DoctorReport { checks, notes }
}

fn file_check(name: &'static str, path: &Path) -> DoctorCheck {
    DoctorCheck {
        name,
        status: if path.exists() { "ok" } else { "missing" },
        detail: path.display().to_string(),
    }
}

fn command_exists(bin: &str) -> bool {
    Command::new(bin)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}
