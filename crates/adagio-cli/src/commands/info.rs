//! Display audio file metadata.

use super::common::format_bytes;
use adagio_io::decode_bytes;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Display audio file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Audio file (WAV, MP3, FLAC, or AAC)
    pub file: PathBuf,

    /// Emit machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FileReport {
    file: String,
    sample_rate: u32,
    frames: usize,
    duration_seconds: f64,
    file_size_bytes: u64,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.file)?;
    let file_size = bytes.len() as u64;
    let asset = decode_bytes(bytes)?;

    if args.json {
        let report = FileReport {
            file: args.file.display().to_string(),
            sample_rate: asset.sample_rate(),
            frames: asset.frames(),
            duration_seconds: asset.duration_seconds(),
            file_size_bytes: file_size,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File:        {}", args.file.display());
    println!("Sample Rate: {} Hz", asset.sample_rate());
    println!(
        "Duration:    {:.3}s ({} frames)",
        asset.duration_seconds(),
        asset.frames()
    );
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}
