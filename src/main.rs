//! colloquy - Speech-to-text with speaker diarization and conversation summaries
//!
//! Entry point for the colloquy CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use colloquy::cli::{Cli, Commands};
use colloquy::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            colloquy::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            // Execute command
            match command {
                Commands::Serve { host, port } => {
                    colloquy::cli::commands::serve(&settings, host, port).await?;
                }
                Commands::Process {
                    input,
                    speakers,
                    no_diarization,
                    output,
                } => {
                    colloquy::cli::commands::process_file(
                        &settings,
                        &input,
                        speakers,
                        no_diarization,
                        output,
                    )
                    .await?;
                }
                Commands::Doctor { json } => {
                    colloquy::cli::commands::run_doctor(&settings, json)?;
                }
                Commands::Config(config_cmd) => {
                    colloquy::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
