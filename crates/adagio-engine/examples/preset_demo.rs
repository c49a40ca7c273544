//! Factory preset demo: listing presets and rendering offline with one.
//!
//! Run with: cargo run -p adagio-engine --example preset_demo

use std::sync::Arc;

use adagio_engine::{
    EchoSettings, ExportFormat, FIELDS, ParameterSet, encode, factory_preset, factory_presets,
    render,
};
use adagio_io::DecodedAsset;

fn main() {
    // --- Factory presets ---
    println!("=== Factory Presets ===\n");

    let presets = factory_presets();
    println!(
        "{:<16} {:>6} {:>6} {:>7}  {}",
        "Name", "Speed", "Pitch", "Reverb", "Description"
    );
    println!("{:-<16} {:->6} {:->6} {:->7}  {:-<36}", "", "", "", "", "");

    for preset in &presets {
        println!(
            "{:<16} {:>6.2} {:>6.1} {:>7.0}  {}",
            preset.name,
            preset.params.speed,
            preset.params.pitch_semitones,
            preset.params.reverb_amount,
            preset.description.as_deref().unwrap_or(""),
        );
    }

    // --- Parameter fields ---
    println!("\n=== Parameter Fields ===\n");

    println!("{:<18} {:>10} {:>10} {:>10}", "Field", "Min", "Max", "Default");
    println!("{:-<18} {:->10} {:->10} {:->10}", "", "", "", "");
    for field in FIELDS {
        println!(
            "{:<18} {:>10} {:>10} {:>10}",
            field.name, field.min, field.max, field.default
        );
    }

    // --- Offline render with a preset ---
    println!("\n=== Offline Render: classic-slowed ===\n");

    let sample_rate = 44100_u32;
    let frames = 2 * sample_rate as usize;
    let tone: Vec<f32> = (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect();
    let asset = Arc::new(DecodedAsset::new(tone.clone(), tone, sample_rate));

    println!(
        "Input:  {:.2} s ({} frames) at {} Hz",
        asset.duration_seconds(),
        asset.frames(),
        sample_rate
    );

    let preset = factory_preset("classic-slowed").unwrap();
    let rendered = render(Arc::clone(&asset), &preset.params, &EchoSettings::default());
    println!(
        "Output: {:.2} s ({} frames) at speed {} and pitch {}",
        rendered.duration_seconds(),
        rendered.frames(),
        preset.params.speed,
        preset.params.pitch_semitones
    );

    let out_peak = rendered.left.iter().map(|x| x.abs()).fold(0.0_f32, f32::max);
    println!("Peak: {:.4}", out_peak);

    let wav = encode(&rendered, ExportFormat::Wav).unwrap();
    println!("Encoded WAV: {} bytes", wav.len());

    // Default parameters leave the length untouched
    let flat = render(asset, &ParameterSet::default(), &EchoSettings::default());
    println!(
        "\nDefault-parameter render: {:.2} s (length unchanged)",
        flat.duration_seconds()
    );

    println!("\nPreset demo complete.");
}
