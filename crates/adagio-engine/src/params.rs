//! Parameter set, partial updates, and range clamping.
//!
//! Every field the engine exposes lives in [`ParameterSet`], backed by the
//! static [`FIELDS`] descriptor table that drives clamping and the CLI's
//! parameter listing. Setters never fail: out-of-range values are clamped
//! into the descriptor's range, and non-finite input follows a fixed
//! policy (+inf takes the upper bound, NaN and -inf the lower).

use serde::{Deserialize, Serialize};

/// Descriptor for one parameter field: name, valid range, and default.
#[derive(Debug, Clone, Copy)]
pub struct ParamDescriptor {
    /// Field name as it appears in preset files and listings.
    pub name: &'static str,
    /// Smallest allowed value.
    pub min: f32,
    /// Largest allowed value.
    pub max: f32,
    /// Value a fresh engine starts with.
    pub default: f32,
}

/// Static descriptor table, one row per [`ParameterSet`] field, in field
/// declaration order.
pub const FIELDS: &[ParamDescriptor] = &[
    ParamDescriptor { name: "speed", min: 0.0625, max: 16.0, default: 1.0 },
    ParamDescriptor { name: "pitch_semitones", min: -24.0, max: 24.0, default: 0.0 },
    ParamDescriptor { name: "reverb_amount", min: 0.0, max: 100.0, default: 0.0 },
    ParamDescriptor { name: "room_size", min: 0.0, max: 100.0, default: 50.0 },
    ParamDescriptor { name: "decay_time", min: 0.1, max: 10.0, default: 2.0 },
    ParamDescriptor { name: "volume", min: 0.0, max: 200.0, default: 100.0 },
    ParamDescriptor { name: "bass_gain", min: -24.0, max: 24.0, default: 0.0 },
    ParamDescriptor { name: "mid_gain", min: -24.0, max: 24.0, default: 0.0 },
    ParamDescriptor { name: "treble_gain", min: -24.0, max: 24.0, default: 0.0 },
    ParamDescriptor { name: "low_pass_freq", min: 20.0, max: 22050.0, default: 20000.0 },
    ParamDescriptor { name: "compression", min: 0.0, max: 100.0, default: 0.0 },
    ParamDescriptor { name: "stereo_width", min: 0.0, max: 200.0, default: 100.0 },
    ParamDescriptor { name: "fade_in", min: 0.0, max: 30.0, default: 0.0 },
    ParamDescriptor { name: "fade_out", min: 0.0, max: 30.0, default: 0.0 },
    ParamDescriptor { name: "pan_position", min: -100.0, max: 100.0, default: 0.0 },
];

/// Clamp one value into a descriptor's range.
///
/// NaN collapses to the lower bound; infinities clamp like any other
/// out-of-range value.
#[inline]
fn clamp_field(value: f32, descriptor: &ParamDescriptor) -> f32 {
    if value.is_nan() {
        descriptor.min
    } else {
        value.clamp(descriptor.min, descriptor.max)
    }
}

/// The full set of processing parameters.
///
/// Plain data: holding a set has no audible effect until it is pushed
/// onto a signal chain. Construct with [`Default`], modify through
/// [`merge`](Self::merge), and rely on the invariant that every stored
/// value is finite and in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Playback rate multiplier.
    pub speed: f32,
    /// Pitch offset in semitones, folded into the playback rate.
    pub pitch_semitones: f32,
    /// Reverb wet mix in percent.
    pub reverb_amount: f32,
    /// Simulated room size in percent, shapes the reverb tone.
    pub room_size: f32,
    /// Reverb tail length in seconds.
    pub decay_time: f32,
    /// Output volume in percent.
    pub volume: f32,
    /// Low shelf gain in dB.
    pub bass_gain: f32,
    /// Mid peaking gain in dB.
    pub mid_gain: f32,
    /// High shelf gain in dB.
    pub treble_gain: f32,
    /// Low-pass cutoff in Hz.
    pub low_pass_freq: f32,
    /// Compression amount in percent, mapped onto threshold and ratio.
    pub compression: f32,
    /// Stereo width in percent (100 = unchanged, 0 = mono).
    pub stereo_width: f32,
    /// Fade-in length in seconds, applied on export only.
    pub fade_in: f32,
    /// Fade-out length in seconds, applied on export only.
    pub fade_out: f32,
    /// Stereo pan position, -100 (left) to 100 (right).
    pub pan_position: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            speed: FIELDS[0].default,
            pitch_semitones: FIELDS[1].default,
            reverb_amount: FIELDS[2].default,
            room_size: FIELDS[3].default,
            decay_time: FIELDS[4].default,
            volume: FIELDS[5].default,
            bass_gain: FIELDS[6].default,
            mid_gain: FIELDS[7].default,
            treble_gain: FIELDS[8].default,
            low_pass_freq: FIELDS[9].default,
            compression: FIELDS[10].default,
            stereo_width: FIELDS[11].default,
            fade_in: FIELDS[12].default,
            fade_out: FIELDS[13].default,
            pan_position: FIELDS[14].default,
        }
    }
}

impl ParameterSet {
    /// Merge a partial update into this set, clamping every provided
    /// field. Fields the update leaves `None` keep their current value.
    #[must_use]
    pub fn merge(&self, update: &ParameterUpdate) -> Self {
        let pick = |current: f32, new: Option<f32>, d: &ParamDescriptor| {
            new.map_or(current, |v| clamp_field(v, d))
        };
        Self {
            speed: pick(self.speed, update.speed, &FIELDS[0]),
            pitch_semitones: pick(self.pitch_semitones, update.pitch_semitones, &FIELDS[1]),
            reverb_amount: pick(self.reverb_amount, update.reverb_amount, &FIELDS[2]),
            room_size: pick(self.room_size, update.room_size, &FIELDS[3]),
            decay_time: pick(self.decay_time, update.decay_time, &FIELDS[4]),
            volume: pick(self.volume, update.volume, &FIELDS[5]),
            bass_gain: pick(self.bass_gain, update.bass_gain, &FIELDS[6]),
            mid_gain: pick(self.mid_gain, update.mid_gain, &FIELDS[7]),
            treble_gain: pick(self.treble_gain, update.treble_gain, &FIELDS[8]),
            low_pass_freq: pick(self.low_pass_freq, update.low_pass_freq, &FIELDS[9]),
            compression: pick(self.compression, update.compression, &FIELDS[10]),
            stereo_width: pick(self.stereo_width, update.stereo_width, &FIELDS[11]),
            fade_in: pick(self.fade_in, update.fade_in, &FIELDS[12]),
            fade_out: pick(self.fade_out, update.fade_out, &FIELDS[13]),
            pan_position: pick(self.pan_position, update.pan_position, &FIELDS[14]),
        }
    }

    /// Clamp every field into range. Used after deserializing sets from
    /// preset files, which may carry arbitrary values.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            speed: clamp_field(self.speed, &FIELDS[0]),
            pitch_semitones: clamp_field(self.pitch_semitones, &FIELDS[1]),
            reverb_amount: clamp_field(self.reverb_amount, &FIELDS[2]),
            room_size: clamp_field(self.room_size, &FIELDS[3]),
            decay_time: clamp_field(self.decay_time, &FIELDS[4]),
            volume: clamp_field(self.volume, &FIELDS[5]),
            bass_gain: clamp_field(self.bass_gain, &FIELDS[6]),
            mid_gain: clamp_field(self.mid_gain, &FIELDS[7]),
            treble_gain: clamp_field(self.treble_gain, &FIELDS[8]),
            low_pass_freq: clamp_field(self.low_pass_freq, &FIELDS[9]),
            compression: clamp_field(self.compression, &FIELDS[10]),
            stereo_width: clamp_field(self.stereo_width, &FIELDS[11]),
            fade_in: clamp_field(self.fade_in, &FIELDS[12]),
            fade_out: clamp_field(self.fade_out, &FIELDS[13]),
            pan_position: clamp_field(self.pan_position, &FIELDS[14]),
        }
    }

    /// Field values in [`FIELDS`] order, paired for listings.
    pub fn values(&self) -> [(&'static str, f32); 15] {
        [
            (FIELDS[0].name, self.speed),
            (FIELDS[1].name, self.pitch_semitones),
            (FIELDS[2].name, self.reverb_amount),
            (FIELDS[3].name, self.room_size),
            (FIELDS[4].name, self.decay_time),
            (FIELDS[5].name, self.volume),
            (FIELDS[6].name, self.bass_gain),
            (FIELDS[7].name, self.mid_gain),
            (FIELDS[8].name, self.treble_gain),
            (FIELDS[9].name, self.low_pass_freq),
            (FIELDS[10].name, self.compression),
            (FIELDS[11].name, self.stereo_width),
            (FIELDS[12].name, self.fade_in),
            (FIELDS[13].name, self.fade_out),
            (FIELDS[14].name, self.pan_position),
        ]
    }
}

/// A partial parameter update: every field optional.
///
/// [`ParameterSet::merge`] is total over the field set, so adding a field
/// to one record without the other is a compile error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParameterUpdate {
    /// New playback rate, if changing.
    pub speed: Option<f32>,
    /// New pitch offset, if changing.
    pub pitch_semitones: Option<f32>,
    /// New reverb mix, if changing.
    pub reverb_amount: Option<f32>,
    /// New room size, if changing.
    pub room_size: Option<f32>,
    /// New decay time, if changing.
    pub decay_time: Option<f32>,
    /// New volume, if changing.
    pub volume: Option<f32>,
    /// New bass gain, if changing.
    pub bass_gain: Option<f32>,
    /// New mid gain, if changing.
    pub mid_gain: Option<f32>,
    /// New treble gain, if changing.
    pub treble_gain: Option<f32>,
    /// New low-pass cutoff, if changing.
    pub low_pass_freq: Option<f32>,
    /// New compression amount, if changing.
    pub compression: Option<f32>,
    /// New stereo width, if changing.
    pub stereo_width: Option<f32>,
    /// New fade-in length, if changing.
    pub fade_in: Option<f32>,
    /// New fade-out length, if changing.
    pub fade_out: Option<f32>,
    /// New pan position, if changing.
    pub pan_position: Option<f32>,
}

impl From<ParameterSet> for ParameterUpdate {
    /// An update that sets every field, for applying a whole set at once.
    fn from(set: ParameterSet) -> Self {
        Self {
            speed: Some(set.speed),
            pitch_semitones: Some(set.pitch_semitones),
            reverb_amount: Some(set.reverb_amount),
            room_size: Some(set.room_size),
            decay_time: Some(set.decay_time),
            volume: Some(set.volume),
            bass_gain: Some(set.bass_gain),
            mid_gain: Some(set.mid_gain),
            treble_gain: Some(set.treble_gain),
            low_pass_freq: Some(set.low_pass_freq),
            compression: Some(set.compression),
            stereo_width: Some(set.stereo_width),
            fade_in: Some(set.fade_in),
            fade_out: Some(set.fade_out),
            pan_position: Some(set.pan_position),
        }
    }
}

/// Echo send settings, held by the engine beside the parameter set.
///
/// Deliberately not part of presets or edit history; the engine re-applies
/// the current settings across graph rebuilds and only [`set_echo`]
/// changes them. The default level of 0 keeps the path silent.
///
/// [`set_echo`]: crate::Engine::set_echo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoSettings {
    /// Tap delay in seconds.
    pub delay_seconds: f32,
    /// Feedback amount; the echo stage caps it below self-oscillation.
    pub feedback: f32,
    /// Wet level into the mix, 0 to 1.
    pub level: f32,
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self {
            delay_seconds: 0.3,
            feedback: 0.3,
            level: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_descriptors() {
        let params = ParameterSet::default();
        for ((_, value), descriptor) in params.values().iter().zip(FIELDS.iter()) {
            assert_eq!(*value, descriptor.default, "{}", descriptor.name);
            assert!(*value >= descriptor.min && *value <= descriptor.max);
        }
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = ParameterSet::default();
        let update = ParameterUpdate {
            speed: Some(0.8),
            ..Default::default()
        };
        let merged = base.merge(&update);
        assert_eq!(merged.speed, 0.8);
        assert_eq!(merged.volume, base.volume);
        assert_eq!(merged.pitch_semitones, base.pitch_semitones);
    }

    #[test]
    fn test_merge_clamps_out_of_range() {
        let merged = ParameterSet::default().merge(&ParameterUpdate {
            speed: Some(100.0),
            pitch_semitones: Some(-99.0),
            volume: Some(-5.0),
            low_pass_freq: Some(1.0),
            ..Default::default()
        });
        assert_eq!(merged.speed, 16.0);
        assert_eq!(merged.pitch_semitones, -24.0);
        assert_eq!(merged.volume, 0.0);
        assert_eq!(merged.low_pass_freq, 20.0);
    }

    #[test]
    fn test_non_finite_policy() {
        let merged = ParameterSet::default().merge(&ParameterUpdate {
            speed: Some(f32::NAN),
            volume: Some(f32::INFINITY),
            pan_position: Some(f32::NEG_INFINITY),
            ..Default::default()
        });
        assert_eq!(merged.speed, 0.0625, "NaN takes the lower bound");
        assert_eq!(merged.volume, 200.0, "+inf takes the upper bound");
        assert_eq!(merged.pan_position, -100.0, "-inf takes the lower bound");
    }

    #[test]
    fn test_update_from_full_set() {
        let set = ParameterSet {
            speed: 0.75,
            reverb_amount: 25.0,
            ..Default::default()
        };

        let update = ParameterUpdate::from(set);
        let merged = ParameterSet::default().merge(&update);
        assert_eq!(merged, set);
    }

    #[test]
    fn test_clamped_normalizes_wild_set() {
        let set = ParameterSet {
            decay_time: 0.0,
            stereo_width: 1000.0,
            bass_gain: f32::NAN,
            ..Default::default()
        };

        let clamped = set.clamped();
        assert_eq!(clamped.decay_time, 0.1);
        assert_eq!(clamped.stereo_width, 200.0);
        assert_eq!(clamped.bass_gain, -24.0);
    }

    #[test]
    fn test_descriptor_table_is_consistent() {
        assert_eq!(FIELDS.len(), 15);
        for d in FIELDS {
            assert!(d.min < d.max, "{}", d.name);
            assert!(d.default >= d.min && d.default <= d.max, "{}", d.name);
        }
    }
}
