//! Equal-power stereo panner.
//!
//! Implements the stereo-input equal-power pan law from the Web Audio
//! StereoPannerNode processing model: panning toward one side folds the
//! opposite channel in with a cosine/sine gain pair, so perceived loudness
//! stays constant across the sweep.

use adagio_core::{SmoothedValue, Stage};
use libm::{cosf, sinf};

/// Stereo panner with a smoothed position control.
///
/// Position ranges from -1.0 (full left) through 0.0 (center, identity)
/// to +1.0 (full right).
///
/// # Example
///
/// ```rust
/// use adagio_effects::StereoPanner;
/// use adagio_core::Stage;
///
/// let mut panner = StereoPanner::new(44100.0);
/// panner.set_pan(-0.5);
/// let (l, r) = panner.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct StereoPanner {
    pan: SmoothedValue,
}

impl StereoPanner {
    /// Create a centered panner.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            pan: SmoothedValue::new(0.0, sample_rate, 10.0),
        }
    }

    /// Set pan position (-1.0 full left to +1.0 full right).
    pub fn set_pan(&mut self, pan: f32) {
        self.pan.set_target(pan.clamp(-1.0, 1.0));
    }

    /// Get the pan position target.
    pub fn pan(&self) -> f32 {
        self.pan.target()
    }
}

impl Default for StereoPanner {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for StereoPanner {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let pan = self.pan.advance();

        let x = if pan <= 0.0 { pan + 1.0 } else { pan };
        let angle = x * core::f32::consts::FRAC_PI_2;
        let gain_l = cosf(angle);
        let gain_r = sinf(angle);

        if pan <= 0.0 {
            // Panning left folds the right channel into the left
            (left + right * gain_l, right * gain_r)
        } else {
            (left * gain_l, right + left * gain_r)
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.pan.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.pan.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_identity() {
        let mut panner = StereoPanner::new(44100.0);

        let (l, r) = panner.process(0.3, 0.7);
        assert!((l - 0.3).abs() < 1e-6, "expected 0.3, got {}", l);
        assert!((r - 0.7).abs() < 1e-6, "expected 0.7, got {}", r);
    }

    #[test]
    fn test_full_left_collapses_right() {
        let mut panner = StereoPanner::new(44100.0);
        panner.set_pan(-1.0);
        panner.reset();

        let (l, r) = panner.process(0.25, 0.5);
        // x = 0: gainL = 1, gainR = 0
        assert!((l - 0.75).abs() < 1e-5, "expected L+R, got {}", l);
        assert!(r.abs() < 1e-5, "right should be silent, got {}", r);
    }

    #[test]
    fn test_full_right_collapses_left() {
        let mut panner = StereoPanner::new(44100.0);
        panner.set_pan(1.0);
        panner.reset();

        let (l, r) = panner.process(0.25, 0.5);
        assert!(l.abs() < 1e-5, "left should be silent, got {}", l);
        assert!((r - 0.75).abs() < 1e-5, "expected R+L, got {}", r);
    }

    #[test]
    fn test_half_left_equal_power() {
        let mut panner = StereoPanner::new(44100.0);
        panner.set_pan(-0.5);
        panner.reset();

        // Right-only input: both outputs get the 45-degree gain 0.7071
        let (l, r) = panner.process(0.0, 1.0);
        let g = core::f32::consts::FRAC_1_SQRT_2;
        assert!((l - g).abs() < 1e-4, "expected ~{}, got {}", g, l);
        assert!((r - g).abs() < 1e-4, "expected ~{}, got {}", g, r);
    }

    #[test]
    fn test_pan_changes_are_smoothed() {
        let mut panner = StereoPanner::new(44100.0);
        panner.set_pan(1.0);

        // First sample after a jump still sits near center
        let (l, _) = panner.process(1.0, 0.0);
        assert!(l > 0.9, "pan should ramp, not jump: left = {}", l);
    }

    #[test]
    fn test_pan_clamped() {
        let mut panner = StereoPanner::new(44100.0);
        panner.set_pan(3.0);
        assert_eq!(panner.pan(), 1.0);
        panner.set_pan(-3.0);
        assert_eq!(panner.pan(), -1.0);
    }
}
