//! Preset listing and inspection commands.

use super::common::resolve_preset;
use adagio_engine::{FIELDS, factory_presets, save_preset};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List the factory presets
    List,

    /// Show every parameter value of a preset
    Show {
        /// Preset name or TOML path
        name: String,
    },

    /// Copy a factory preset to a TOML file for customization
    Copy {
        /// Factory preset name
        source: String,

        /// Destination path (defaults to <name>.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the presets command.
pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List => list(),
        PresetsCommand::Show { name } => show(&name),
        PresetsCommand::Copy { source, output } => copy(&source, output),
    }
}

fn list() -> anyhow::Result<()> {
    println!("Factory presets:\n");
    for preset in factory_presets() {
        let p = &preset.params;
        println!(
            "  {:<16} speed {:>5.2}x  pitch {:>+5.1}  reverb {:>3.0}%   {}",
            preset.name,
            p.speed,
            p.pitch_semitones,
            p.reverb_amount,
            preset.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn show(name: &str) -> anyhow::Result<()> {
    let preset = resolve_preset(name)?;
    println!("Preset: {}", preset.name);
    if let Some(description) = &preset.description {
        println!("  {description}");
    }
    println!();

    for ((field, value), descriptor) in preset.params.values().iter().zip(FIELDS) {
        println!(
            "  {:<16} {:>10.2}   [{} .. {}]",
            field, value, descriptor.min, descriptor.max
        );
    }
    Ok(())
}

fn copy(source: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let preset = resolve_preset(source)?;
    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.toml", preset.name)));
    save_preset(&path, &preset)?;
    println!("Wrote {}", path.display());
    Ok(())
}
