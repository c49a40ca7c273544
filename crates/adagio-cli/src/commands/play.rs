//! Live playback command.

use super::common::{parse_key_val, resolve_preset, update_from_pairs};
use adagio_engine::{Engine, EngineEvent};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[derive(Args)]
pub struct PlayArgs {
    /// Audio file to play (WAV, MP3, FLAC, or AAC)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Preset name or TOML path, applied before --set overrides
    #[arg(short, long)]
    preset: Option<String>,

    /// Parameter override (e.g. --set reverb=40), repeatable
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, String)>,

    /// Start position in seconds
    #[arg(long, default_value = "0")]
    start: f64,

    /// Show a live spectrum meter next to the position readout
    #[arg(long)]
    meter: bool,

    /// Loop playback
    #[arg(short, long, alias = "repeat")]
    r#loop: bool,
}

/// Run the play command.
pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    println!("Loading {}...", args.file.display());
    let bytes = std::fs::read(&args.file)?;
    let mut engine = Engine::new();
    let duration = engine.load_audio_file(bytes)?;

    if let Some(name) = &args.preset {
        let preset = resolve_preset(name)?;
        println!("Applying preset: {}", preset.name);
        engine.apply_preset(&preset);
    }
    engine.set_parameters(update_from_pairs(&args.set)?);

    if let Some(device) = adagio_io::default_device_name() {
        println!("Output device: {device}");
    }

    if args.start > 0.0 {
        engine.seek_to(args.start);
    }
    engine.play()?;
    engine.take_events();
    println!(
        "Playing{} ({duration:.1}s)... Press Ctrl+C to stop.\n",
        if args.r#loop { " (looping)" } else { "" }
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut stdout = std::io::stdout();
    loop {
        if !running.load(Ordering::SeqCst) {
            engine.stop();
            println!("\nStopped.");
            break;
        }

        let ended = engine
            .take_events()
            .iter()
            .any(|e| *e == EngineEvent::SongEnded);
        if ended {
            if args.r#loop {
                engine.play()?;
            } else {
                println!("\nDone.");
                break;
            }
        }

        let position = engine.current_time();
        if args.meter {
            let bar = meter_bar(&engine.frequency_data(), 32);
            print!("\r  {position:6.1}s / {duration:.1}s  {bar}");
        } else {
            print!("\r  {position:6.1}s / {duration:.1}s");
        }
        stdout.flush()?;

        std::thread::sleep(Duration::from_millis(100));
    }

    engine.destroy();
    Ok(())
}

/// Render spectrum bytes as a fixed-width text meter.
fn meter_bar(spectrum: &[u8], width: usize) -> String {
    let sum: usize = spectrum.iter().map(|&b| usize::from(b)).sum();
    let average = sum / spectrum.len().max(1);
    let filled = average * width / 255;

    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    for i in 0..width {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}
