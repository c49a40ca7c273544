//! Shared helpers for CLI commands.

use adagio_engine::{FIELDS, ParameterUpdate, Preset, factory_preset, load_preset};
use std::path::Path;

/// Parse a `key=value` pair from the command line.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{s}' (expected key=value)"
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// Resolve a preset argument: factory name first, then a TOML path.
pub fn resolve_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = factory_preset(name) {
        return Ok(preset);
    }
    let path = Path::new(name);
    if path.exists() {
        return Ok(load_preset(path)?);
    }
    anyhow::bail!("unknown preset '{name}' (not a factory preset or a readable file)")
}

/// Build a parameter update from `key=value` pairs.
pub fn update_from_pairs(pairs: &[(String, String)]) -> anyhow::Result<ParameterUpdate> {
    let mut update = ParameterUpdate::default();
    for (key, value) in pairs {
        let value: f32 = value
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid number '{value}' for parameter '{key}'"))?;
        set_field(&mut update, key, value)?;
    }
    Ok(update)
}

fn set_field(update: &mut ParameterUpdate, key: &str, value: f32) -> anyhow::Result<()> {
    let slot = match key {
        "speed" => &mut update.speed,
        "pitch_semitones" | "pitch" => &mut update.pitch_semitones,
        "reverb_amount" | "reverb" => &mut update.reverb_amount,
        "room_size" => &mut update.room_size,
        "decay_time" => &mut update.decay_time,
        "volume" => &mut update.volume,
        "bass_gain" | "bass" => &mut update.bass_gain,
        "mid_gain" | "mid" => &mut update.mid_gain,
        "treble_gain" | "treble" => &mut update.treble_gain,
        "low_pass_freq" | "lowpass" => &mut update.low_pass_freq,
        "compression" => &mut update.compression,
        "stereo_width" | "width" => &mut update.stereo_width,
        "fade_in" => &mut update.fade_in,
        "fade_out" => &mut update.fade_out,
        "pan_position" | "pan" => &mut update.pan_position,
        other => {
            let known: Vec<&str> = FIELDS.iter().map(|d| d.name).collect();
            anyhow::bail!("unknown parameter '{}'; known: {}", other, known.join(", "));
        }
    };
    *slot = Some(value);
    Ok(())
}

/// Human-readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
