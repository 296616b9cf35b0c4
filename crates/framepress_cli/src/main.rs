//! Command-line frontend for the framepress recompression pipeline.
//!
//! Usage:
//!   framepress input.mp4 output.mp4 --level 5

mod cli;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use framepress_core::config::ConfigManager;
use framepress_core::models::{CompressionLevel, JobSpec};
use framepress_core::orchestrator::JobRunner;
use framepress_core::progress::JobEvent;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick a default from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "framepress_core=debug,framepress_cli=debug".to_string()
        } else {
            "framepress_core=info,framepress_cli=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(".config/framepress.toml"));
    let mut config = ConfigManager::new(&config_path);
    config
        .load_or_create()
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    config.ensure_dirs_exist()?;

    let level = CompressionLevel::new(cli.level)?;
    let spec = JobSpec::new(&cli.input, &cli.output, level);

    tracing::info!(
        "recompressing {} -> {} at quality level {}",
        cli.input.display(),
        cli.output.display(),
        level
    );

    let runner = JobRunner::new(config.settings().clone());
    let handle = runner.start(spec);

    let mut outcome: Result<()> = Ok(());
    for event in handle.events().iter() {
        match event {
            JobEvent::Progress(progress) => {
                print!("\r[{:3}%] {:<40}", progress.percent, progress.label);
                let _ = io::stdout().flush();
            }
            JobEvent::Completed { output_path } => {
                println!("\nDone: {}", output_path.display());
            }
            JobEvent::Cancelled => {
                println!("\nCancelled.");
                outcome = Err(anyhow::anyhow!("job was cancelled"));
            }
            JobEvent::Failed { error } => {
                println!();
                outcome = Err(anyhow::Error::new(error).context("recompression failed"));
            }
        }
    }
    handle.join();

    outcome
}
