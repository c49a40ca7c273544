//! Offline rendering and export encoding.
//!
//! Rendering runs the same signal chain as live playback, but at the
//! asset's native sample rate and faster than real time. The output is
//! exactly `asset_frames / (speed * 2^(pitch/12))` frames long, so rate
//! changes shorten or stretch the file; effect tails past that point are
//! truncated. Fade in and out exist only here: live playback never
//! applies them.

use crate::error::{EngineError, Result};
use crate::graph::SignalChain;
use crate::params::{EchoSettings, ParameterSet};
use crate::source::AssetSource;
use adagio_core::math::semitone_ratio;
use adagio_io::DecodedAsset;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Frames rendered between progress callbacks.
const RENDER_BLOCK: usize = 512;

/// Containers the engine can export to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// 16-bit PCM WAV.
    Wav,
}

impl ExportFormat {
    /// File extension for the format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Wav => "wav",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("wav") {
            Ok(ExportFormat::Wav)
        } else {
            Err(EngineError::UnsupportedExportFormat(s.to_string()))
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Planar stereo output of an offline render.
pub struct RenderedAudio {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
    /// Sample rate of both channels in Hz.
    pub sample_rate: u32,
}

impl RenderedAudio {
    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// Output duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Render the whole asset through the chain with `params` and `echo`.
pub fn render(asset: Arc<DecodedAsset>, params: &ParameterSet, echo: &EchoSettings) -> RenderedAudio {
    render_with_progress(asset, params, echo, |_| {})
}

/// [`render`] with a progress callback in `[0, 1]`.
///
/// Progress is reported once per rendered block and is non-decreasing;
/// the final call is exactly `1.0`.
pub fn render_with_progress(
    asset: Arc<DecodedAsset>,
    params: &ParameterSet,
    echo: &EchoSettings,
    mut progress: impl FnMut(f32),
) -> RenderedAudio {
    let sample_rate = asset.sample_rate();
    let rate = f64::from(params.speed) * f64::from(semitone_ratio(params.pitch_semitones));
    let total = if asset.frames() == 0 || rate <= 0.0 {
        0
    } else {
        (asset.frames() as f64 / rate).ceil() as usize
    };

    let mut chain = SignalChain::build(params, echo, sample_rate as f32);
    let mut source = AssetSource::new(asset, sample_rate, params.speed, params.pitch_semitones, 0.0);

    let mut left = Vec::with_capacity(total);
    let mut right = Vec::with_capacity(total);
    while left.len() < total {
        let block = RENDER_BLOCK.min(total - left.len());
        for _ in 0..block {
            let (l, r) = source.next_frame();
            let (l, r) = chain.process(l, r);
            left.push(l);
            right.push(r);
        }
        progress((left.len() as f64 / total as f64) as f32);
    }
    if total == 0 {
        progress(1.0);
    }

    let mut rendered = RenderedAudio {
        left,
        right,
        sample_rate,
    };
    apply_fades(&mut rendered, params.fade_in, params.fade_out);
    rendered
}

/// Encode rendered audio into the requested container.
pub fn encode(rendered: &RenderedAudio, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Wav => {
            adagio_io::encode_wav(&rendered.left, &rendered.right, rendered.sample_rate)
                .map_err(|e| EngineError::ExportFailure(e.to_string()))
        }
    }
}

/// Linear fade in over the first `fade_in` seconds and fade out over the
/// last `fade_out` seconds of the output.
fn apply_fades(rendered: &mut RenderedAudio, fade_in: f32, fade_out: f32) {
    let len = rendered.frames();
    let rate = f64::from(rendered.sample_rate);

    if fade_in > 0.0 {
        let fade_frames = (f64::from(fade_in) * rate) as usize;
        if fade_frames > 0 {
            let n = fade_frames.min(len);
            for i in 0..n {
                let gain = i as f32 / fade_frames as f32;
                rendered.left[i] *= gain;
                rendered.right[i] *= gain;
            }
        }
    }

    if fade_out > 0.0 {
        let fade_frames = (f64::from(fade_out) * rate) as usize;
        if fade_frames > 0 {
            let n = fade_frames.min(len);
            let start = len - n;
            for i in 0..n {
                let gain = (n - i) as f32 / fade_frames as f32;
                rendered.left[start + i] *= gain;
                rendered.right[start + i] *= gain;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dc_asset(frames: usize) -> Arc<DecodedAsset> {
        Arc::new(DecodedAsset::new(
            vec![0.5; frames],
            vec![0.5; frames],
            44_100,
        ))
    }

    #[test]
    fn test_output_length_follows_playback_rate() {
        let asset = dc_asset(44_100);

        let params = ParameterSet::default();
        let out = render(Arc::clone(&asset), &params, &EchoSettings::default());
        assert_eq!(out.frames(), 44_100);

        let double = ParameterSet {
            speed: 2.0,
            ..ParameterSet::default()
        };
        let out = render(Arc::clone(&asset), &double, &EchoSettings::default());
        assert_eq!(out.frames(), 22_050);

        let octave_up = ParameterSet {
            pitch_semitones: 12.0,
            ..ParameterSet::default()
        };
        let out = render(asset, &octave_up, &EchoSettings::default());
        assert!((out.frames() as i64 - 22_050).abs() <= 1);
    }

    #[test]
    fn test_default_params_pass_audio_through() {
        let out = render(
            dc_asset(44_100),
            &ParameterSet::default(),
            &EchoSettings::default(),
        );
        // Late in the buffer the filters have settled on the DC input.
        assert!((out.left[30_000] - 0.5).abs() < 0.01, "{}", out.left[30_000]);
        assert!((out.right[30_000] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_fade_in_starts_silent_and_reaches_full() {
        let params = ParameterSet {
            fade_in: 0.1,
            ..ParameterSet::default()
        };
        let out = render(dc_asset(44_100), &params, &EchoSettings::default());

        assert_eq!(out.left[0], 0.0);
        let quarter = 44_100 / 40;
        assert!(out.left[quarter] < out.left[quarter * 2]);
        assert!((out.left[30_000] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_fade_out_ends_near_silence() {
        let params = ParameterSet {
            fade_out: 0.1,
            ..ParameterSet::default()
        };
        let out = render(dc_asset(44_100), &params, &EchoSettings::default());

        let last = out.left[out.frames() - 1];
        assert!(last.abs() < 0.001, "last sample was {last}");
        assert!((out.left[30_000] - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_render_is_deterministic() {
        let params = ParameterSet {
            reverb_amount: 30.0,
            compression: 40.0,
            ..ParameterSet::default()
        };
        let echo = EchoSettings {
            level: 0.4,
            ..EchoSettings::default()
        };

        let a = render(dc_asset(4_410), &params, &echo);
        let b = render(dc_asset(4_410), &params, &echo);
        let wav_a = encode(&a, ExportFormat::Wav).unwrap();
        let wav_b = encode(&b, ExportFormat::Wav).unwrap();
        assert_eq!(wav_a, wav_b);
    }

    #[test]
    fn test_progress_is_monotonic_and_completes() {
        let mut reports = Vec::new();
        render_with_progress(
            dc_asset(10_000),
            &ParameterSet::default(),
            &EchoSettings::default(),
            |p| reports.push(p),
        );

        assert!(!reports.is_empty());
        assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*reports.last().unwrap(), 1.0);
    }

    #[test]
    fn test_empty_asset_renders_empty_output() {
        let asset = Arc::new(DecodedAsset::new(Vec::new(), Vec::new(), 44_100));
        let mut reports = Vec::new();
        let out = render_with_progress(
            asset,
            &ParameterSet::default(),
            &EchoSettings::default(),
            |p| reports.push(p),
        );
        assert_eq!(out.frames(), 0);
        assert_eq!(reports, vec![1.0]);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("wav".parse::<ExportFormat>().unwrap(), ExportFormat::Wav);
        assert_eq!("WAV".parse::<ExportFormat>().unwrap(), ExportFormat::Wav);
        assert!(matches!(
            "mp3".parse::<ExportFormat>(),
            Err(EngineError::UnsupportedExportFormat(f)) if f == "mp3"
        ));
        assert_eq!(ExportFormat::Wav.to_string(), "wav");
    }
}
