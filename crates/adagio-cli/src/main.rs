//! Adagio CLI - slowed + reverb style audio processing from the command line.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "adagio")]
#[command(author, version, about = "Adagio audio engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about an audio file
    Info(commands::info::InfoArgs),

    /// Render a file through the effect chain into a WAV
    Export(commands::export::ExportArgs),

    /// Play a file through the effect chain
    Play(commands::play::PlayArgs),

    /// List and inspect parameter presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
