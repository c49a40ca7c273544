//! Named parameter bundles and the factory preset bank.
//!
//! Presets round-trip through TOML. The six factory presets ship embedded
//! as TOML constants and are parsed on access; user presets load and save
//! from explicit paths.

use crate::params::ParameterSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named, serializable parameter bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name shown in listings and used for lookup.
    pub name: String,
    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The full parameter set this preset applies.
    pub params: ParameterSet,
}

/// Errors from preset file round-trips.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// The file could not be read or written.
    #[error("preset file error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid preset TOML.
    #[error("preset parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The preset could not be serialized.
    #[error("preset serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

const CLASSIC_SLOWED: &str = r#"
name = "classic-slowed"
description = "The classic slowed + reverb sound"

[params]
speed = 0.75
pitch_semitones = -2.0
reverb_amount = 25.0
room_size = 70.0
decay_time = 3.0
volume = 90.0
bass_gain = 3.0
mid_gain = -1.0
treble_gain = -2.0
low_pass_freq = 8000.0
compression = 15.0
stereo_width = 120.0
fade_in = 0.0
fade_out = 0.0
pan_position = 0.0
"#;

const NIGHTCORE: &str = r#"
name = "nightcore"
description = "Sped up and brightened"

[params]
speed = 1.3
pitch_semitones = 4.0
reverb_amount = 10.0
room_size = 30.0
decay_time = 1.5
volume = 95.0
bass_gain = -2.0
mid_gain = 2.0
treble_gain = 4.0
low_pass_freq = 20000.0
compression = 25.0
stereo_width = 110.0
fade_in = 0.0
fade_out = 0.0
pan_position = 0.0
"#;

const VAPORWAVE: &str = r#"
name = "vaporwave"
description = "Deep slowdown with a washed-out top end"

[params]
speed = 0.6
pitch_semitones = -4.0
reverb_amount = 40.0
room_size = 80.0
decay_time = 4.0
volume = 85.0
bass_gain = 2.0
mid_gain = -2.0
treble_gain = -4.0
low_pass_freq = 6000.0
compression = 10.0
stereo_width = 140.0
fade_in = 0.5
fade_out = 0.5
pan_position = 0.0
"#;

const AMBIENT: &str = r#"
name = "ambient"
description = "Long reverb tail, wide and dark"

[params]
speed = 0.8
pitch_semitones = 0.0
reverb_amount = 60.0
room_size = 90.0
decay_time = 6.0
volume = 80.0
bass_gain = 1.0
mid_gain = -3.0
treble_gain = -5.0
low_pass_freq = 4000.0
compression = 5.0
stereo_width = 160.0
fade_in = 2.0
fade_out = 2.0
pan_position = 0.0
"#;

const HYPERPOP: &str = r#"
name = "hyperpop"
description = "Fast, loud, and compressed"

[params]
speed = 1.1
pitch_semitones = 2.0
reverb_amount = 15.0
room_size = 40.0
decay_time = 2.0
volume = 100.0
bass_gain = 5.0
mid_gain = 3.0
treble_gain = 6.0
low_pass_freq = 20000.0
compression = 40.0
stereo_width = 90.0
fade_in = 0.0
fade_out = 0.0
pan_position = 0.0
"#;

const LO_FI: &str = r#"
name = "lo-fi"
description = "Muffled and narrow, tape-style"

[params]
speed = 0.9
pitch_semitones = -1.0
reverb_amount = 20.0
room_size = 50.0
decay_time = 2.5
volume = 85.0
bass_gain = 4.0
mid_gain = -2.0
treble_gain = -6.0
low_pass_freq = 3000.0
compression = 20.0
stereo_width = 80.0
fade_in = 0.2
fade_out = 0.2
pan_position = 0.0
"#;

const FACTORY_TOML: [&str; 6] = [
    CLASSIC_SLOWED,
    NIGHTCORE,
    VAPORWAVE,
    AMBIENT,
    HYPERPOP,
    LO_FI,
];

/// All factory presets, in display order.
///
/// Parsed from the embedded TOML on each call; a constant that fails to
/// parse is dropped (the test suite pins the expected count).
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_TOML
        .iter()
        .filter_map(|text| toml::from_str(text).ok())
        .collect()
}

/// Look up a factory preset by name, case-insensitively.
pub fn factory_preset(name: &str) -> Option<Preset> {
    factory_presets()
        .into_iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Load a preset from a TOML file, clamping its parameters into range.
pub fn load_preset(path: &Path) -> Result<Preset, PresetError> {
    let text = std::fs::read_to_string(path)?;
    let mut preset: Preset = toml::from_str(&text)?;
    preset.params = preset.params.clamped();
    Ok(preset)
}

/// Save a preset as a TOML file.
pub fn save_preset(path: &Path, preset: &Preset) -> Result<(), PresetError> {
    let text = toml::to_string_pretty(preset)?;
    std::fs::write(path, text)?;
    Ok(())
}
