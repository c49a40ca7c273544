//! Master output level.

use adagio_core::{LinearRamp, SmoothedValue, Stage};

/// Final gain stage: smoothed volume multiplied by a linear fade ramp.
///
/// The volume control is the user-facing loudness (0.0 to 2.0, unity 1.0).
/// The fade ramp is a separate multiplier driven by crossfades: two decks
/// running complementary linear ramps sum to constant gain.
///
/// # Example
///
/// ```rust
/// use adagio_effects::OutputLevel;
/// use adagio_core::Stage;
///
/// let mut level = OutputLevel::new(44100.0);
/// level.set_volume(0.9);
/// let (l, r) = level.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct OutputLevel {
    volume: SmoothedValue,
    fade: LinearRamp,
}

impl OutputLevel {
    /// Create a unity-gain output stage with no fade in progress.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            volume: SmoothedValue::new(1.0, sample_rate, 10.0),
            fade: LinearRamp::new(1.0, sample_rate, 0.0),
        }
    }

    /// Set the volume gain (0.0 to 2.0, where 1.0 is unity).
    pub fn set_volume(&mut self, gain: f32) {
        self.volume.set_target(gain.clamp(0.0, 2.0));
    }

    /// Get the volume gain target.
    pub fn volume(&self) -> f32 {
        self.volume.target()
    }

    /// Start a linear fade toward `target` gain over `seconds`.
    pub fn begin_fade(&mut self, target: f32, seconds: f32) {
        self.fade.set_transition_secs(seconds.max(0.0));
        self.fade.set_target(target.clamp(0.0, 1.0));
    }

    /// Jump the fade gain immediately (no ramp).
    pub fn set_fade_immediate(&mut self, gain: f32) {
        self.fade.set_immediate(gain.clamp(0.0, 1.0));
    }

    /// Current fade gain.
    pub fn fade_gain(&self) -> f32 {
        self.fade.get()
    }

    /// True once the fade ramp has reached its target.
    pub fn fade_complete(&self) -> bool {
        self.fade.is_settled()
    }
}

impl Default for OutputLevel {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for OutputLevel {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let gain = self.volume.advance() * self.fade.advance();
        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.volume.set_sample_rate(sample_rate);
        self.fade.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.volume.snap_to_target();
        self.fade.snap_to_target();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unity_by_default() {
        let mut level = OutputLevel::new(44100.0);
        let (l, r) = level.process(0.5, -0.5);
        assert!((l - 0.5).abs() < 1e-6);
        assert!((r + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_volume_scales() {
        let mut level = OutputLevel::new(44100.0);
        level.set_volume(0.5);
        level.reset();

        let (l, _) = level.process(0.8, 0.8);
        assert!((l - 0.4).abs() < 1e-5, "expected 0.4, got {}", l);
    }

    #[test]
    fn test_volume_clamped() {
        let mut level = OutputLevel::new(44100.0);
        level.set_volume(9.0);
        assert_eq!(level.volume(), 2.0);
        level.set_volume(-1.0);
        assert_eq!(level.volume(), 0.0);
    }

    #[test]
    fn test_fade_reaches_target() {
        let mut level = OutputLevel::new(44100.0);
        level.set_fade_immediate(0.0);
        level.begin_fade(1.0, 0.01);

        let samples = (44100.0 * 0.01) as usize;
        let mut last = 0.0;
        for _ in 0..samples {
            (last, _) = level.process(1.0, 1.0);
        }

        assert!((last - 1.0).abs() < 1e-4, "fade should complete, got {}", last);
        assert!(level.fade_complete());
    }

    #[test]
    fn test_fade_is_linear_midpoint() {
        let mut level = OutputLevel::new(44100.0);
        level.set_fade_immediate(0.0);
        level.begin_fade(1.0, 0.02);

        let half = (44100.0 * 0.01) as usize;
        let mut value = 0.0;
        for _ in 0..half {
            (value, _) = level.process(1.0, 1.0);
        }

        assert!(
            (value - 0.5).abs() < 0.01,
            "halfway through a linear fade, expected ~0.5, got {}",
            value
        );
    }
}
