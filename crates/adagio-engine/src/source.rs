//! Variable-rate reader over a decoded asset.
//!
//! Speed and pitch combine into a single read-head step: the source walks
//! the asset at `speed * 2^(pitch/12)` asset frames per output frame,
//! resampled by linear interpolation. Both knobs therefore shift pitch;
//! they differ only in how far the step moves.

use adagio_core::math::semitone_ratio;
use adagio_io::DecodedAsset;
use std::sync::Arc;

/// Streams stereo frames out of a [`DecodedAsset`] at a variable rate.
pub(crate) struct AssetSource {
    asset: Arc<DecodedAsset>,
    /// Read head in asset frames.
    position: f64,
    /// Asset frames consumed per output frame.
    step: f64,
    finished: bool,
}

impl AssetSource {
    /// A source reading `asset` from `start_seconds`, producing frames at
    /// `output_rate` with the given speed and pitch shift applied.
    pub(crate) fn new(
        asset: Arc<DecodedAsset>,
        output_rate: u32,
        speed: f32,
        pitch_semitones: f32,
        start_seconds: f64,
    ) -> Self {
        let playback_rate = f64::from(speed) * f64::from(semitone_ratio(pitch_semitones));
        let step = playback_rate * f64::from(asset.sample_rate()) / f64::from(output_rate.max(1));
        let frames = asset.frames();
        let position =
            (start_seconds * f64::from(asset.sample_rate())).clamp(0.0, frames as f64);
        Self {
            asset,
            position,
            step,
            finished: frames == 0,
        }
    }

    /// The next output frame, or silence once the asset is exhausted.
    pub(crate) fn next_frame(&mut self) -> (f32, f32) {
        if self.finished {
            return (0.0, 0.0);
        }
        let frames = self.asset.frames();
        let index = self.position as usize;
        if index >= frames {
            self.finished = true;
            return (0.0, 0.0);
        }

        let frac = (self.position - index as f64) as f32;
        let next = (index + 1).min(frames - 1);
        let left = self.asset.left();
        let right = self.asset.right();
        let l = left[index] + (left[next] - left[index]) * frac;
        let r = right[index] + (right[next] - right[index]) * frac;

        self.position += self.step;
        (l, r)
    }

    /// True once the read head has run off the end of the asset.
    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }
}
