//! Mid/side stereo width control.
//!
//! ```text
//! mid  = (L + R) * 0.5
//! side = (L - R) * 0.5 * width
//! out_l = mid + side
//! out_r = mid - side
//! ```
//!
//! At width 1.0 the stage is an exact identity. At 0.0 the output is mono;
//! at 2.0 the side content is doubled.

use adagio_core::{SmoothedValue, Stage};

/// Stereo width stage (amplitude-domain M/S scaling).
///
/// # Example
///
/// ```rust
/// use adagio_effects::StereoWidth;
/// use adagio_core::Stage;
///
/// let mut width = StereoWidth::new(44100.0);
/// width.set_width(1.4);
/// let (l, r) = width.process(0.3, 0.7);
/// ```
#[derive(Debug, Clone)]
pub struct StereoWidth {
    width: SmoothedValue,
}

impl StereoWidth {
    /// Create a width stage at the identity setting (1.0).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            width: SmoothedValue::new(1.0, sample_rate, 10.0),
        }
    }

    /// Set the width factor (0.0 = mono, 1.0 = unchanged, 2.0 = doubled
    /// side content). Clamped to [0, 2].
    pub fn set_width(&mut self, width: f32) {
        self.width.set_target(width.clamp(0.0, 2.0));
    }

    /// Get the width factor target.
    pub fn width(&self) -> f32 {
        self.width.target()
    }
}

impl Default for StereoWidth {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for StereoWidth {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let w = self.width.advance();
        let mid = (left + right) * 0.5;
        let side = (left - right) * 0.5 * w;
        (mid + side, mid - side)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.width.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.width.snap_to_target();
    }
}
