//! Offline rendering command.

use super::common::{format_bytes, parse_key_val, resolve_preset, update_from_pairs};
use adagio_core::math::semitone_ratio;
use adagio_engine::{Engine, ExportFormat};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ExportArgs {
    /// Input audio file (WAV, MP3, FLAC, or AAC)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML path, applied before --set overrides
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override (e.g. --set speed=0.75), repeatable
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, String)>,

    /// Output container format
    #[arg(long, default_value = "wav")]
    format: String,
}

/// Run the export command.
pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let format: ExportFormat = args.format.parse()?;

    println!("Reading {}...", args.input.display());
    let bytes = std::fs::read(&args.input)?;
    let mut engine = Engine::new();
    let duration = engine.load_audio_file(bytes)?;
    println!("  {duration:.2}s of audio");

    if let Some(name) = &args.preset {
        let preset = resolve_preset(name)?;
        println!("Applying preset: {}", preset.name);
        engine.apply_preset(&preset);
    }
    engine.set_parameters(update_from_pairs(&args.set)?);

    let params = engine.parameters();
    let rate = f64::from(params.speed) * f64::from(semitone_ratio(params.pitch_semitones));
    println!(
        "  speed {:.2}x, pitch {:+.1} st, reverb {:.0}%, output {:.2}s",
        params.speed,
        params.pitch_semitones,
        params.reverb_amount,
        duration / rate
    );

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );
    let rendered = engine.export_audio_with_progress(format, None, |p| {
        pb.set_position((p * 100.0) as u64);
    })?;
    pb.finish_with_message("done");

    std::fs::write(&args.output, &rendered)?;
    println!(
        "\nWrote {} ({})",
        args.output.display(),
        format_bytes(rendered.len() as u64)
    );

    Ok(())
}
