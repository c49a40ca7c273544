//! 3-band tone equalizer.
//!
//! Fixed-frequency bass shelf, mid peak and treble shelf. Only the band
//! gains are adjustable; the corner frequencies and Q stay put so the
//! control surface is three sliders, not nine knobs.

use adagio_core::{
    Biquad, SmoothedValue, Stage, high_shelf_coefficients, low_shelf_coefficients,
    peaking_eq_coefficients,
};

/// Low shelf corner frequency in Hz.
const BASS_FREQ: f32 = 320.0;
/// Mid peaking band center frequency in Hz.
const MID_FREQ: f32 = 1000.0;
/// Mid peaking band Q (wide bell).
const MID_Q: f32 = 0.5;
/// High shelf corner frequency in Hz.
const TREBLE_FREQ: f32 = 3200.0;
/// Band gain limit in dB.
const GAIN_LIMIT_DB: f32 = 24.0;

/// 3-band tone EQ: low shelf at 320 Hz, peaking at 1 kHz (Q 0.5),
/// high shelf at 3.2 kHz.
///
/// Gains are smoothed, and the biquad coefficients follow the smoothed
/// value while it ramps so gain changes don't click.
///
/// # Example
///
/// ```rust
/// use adagio_effects::ThreeBandEq;
/// use adagio_core::Stage;
///
/// let mut eq = ThreeBandEq::new(44100.0);
/// eq.set_bass_db(4.0);
/// eq.set_mid_db(-2.0);
/// eq.set_treble_db(-6.0);
///
/// let (l, r) = eq.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct ThreeBandEq {
    bass_l: Biquad,
    bass_r: Biquad,
    mid_l: Biquad,
    mid_r: Biquad,
    treble_l: Biquad,
    treble_r: Biquad,

    bass_gain: SmoothedValue,
    mid_gain: SmoothedValue,
    treble_gain: SmoothedValue,

    sample_rate: f32,
    needs_update: bool,
}

impl ThreeBandEq {
    /// Create a flat (0 dB everywhere) equalizer.
    pub fn new(sample_rate: f32) -> Self {
        let mut eq = Self {
            bass_l: Biquad::new(),
            bass_r: Biquad::new(),
            mid_l: Biquad::new(),
            mid_r: Biquad::new(),
            treble_l: Biquad::new(),
            treble_r: Biquad::new(),
            bass_gain: SmoothedValue::new(0.0, sample_rate, 10.0),
            mid_gain: SmoothedValue::new(0.0, sample_rate, 10.0),
            treble_gain: SmoothedValue::new(0.0, sample_rate, 10.0),
            sample_rate,
            needs_update: true,
        };
        eq.update_coefficients();
        eq
    }

    /// Set bass shelf gain in dB (-24 to +24).
    pub fn set_bass_db(&mut self, gain_db: f32) {
        self.bass_gain
            .set_target(gain_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB));
        self.needs_update = true;
    }

    /// Get bass shelf gain target in dB.
    pub fn bass_db(&self) -> f32 {
        self.bass_gain.target()
    }

    /// Set mid peak gain in dB (-24 to +24).
    pub fn set_mid_db(&mut self, gain_db: f32) {
        self.mid_gain
            .set_target(gain_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB));
        self.needs_update = true;
    }

    /// Get mid peak gain target in dB.
    pub fn mid_db(&self) -> f32 {
        self.mid_gain.target()
    }

    /// Set treble shelf gain in dB (-24 to +24).
    pub fn set_treble_db(&mut self, gain_db: f32) {
        self.treble_gain
            .set_target(gain_db.clamp(-GAIN_LIMIT_DB, GAIN_LIMIT_DB));
        self.needs_update = true;
    }

    /// Get treble shelf gain target in dB.
    pub fn treble_db(&self) -> f32 {
        self.treble_gain.target()
    }

    fn update_coefficients(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            low_shelf_coefficients(BASS_FREQ, self.bass_gain.get(), self.sample_rate);
        self.bass_l.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.bass_r.set_coefficients(b0, b1, b2, a0, a1, a2);

        let (b0, b1, b2, a0, a1, a2) =
            peaking_eq_coefficients(MID_FREQ, MID_Q, self.mid_gain.get(), self.sample_rate);
        self.mid_l.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.mid_r.set_coefficients(b0, b1, b2, a0, a1, a2);

        let (b0, b1, b2, a0, a1, a2) =
            high_shelf_coefficients(TREBLE_FREQ, self.treble_gain.get(), self.sample_rate);
        self.treble_l.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.treble_r.set_coefficients(b0, b1, b2, a0, a1, a2);

        self.needs_update = false;
    }

    fn is_settled(&self) -> bool {
        self.bass_gain.is_settled() && self.mid_gain.is_settled() && self.treble_gain.is_settled()
    }
}

impl Default for ThreeBandEq {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for ThreeBandEq {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.bass_gain.advance();
        self.mid_gain.advance();
        self.treble_gain.advance();

        if self.needs_update || !self.is_settled() {
            self.update_coefficients();
        }

        let l = self.bass_l.process(left);
        let l = self.mid_l.process(l);
        let l = self.treble_l.process(l);

        let r = self.bass_r.process(right);
        let r = self.mid_r.process(r);
        let r = self.treble_r.process(r);

        (l, r)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.bass_gain.set_sample_rate(sample_rate);
        self.mid_gain.set_sample_rate(sample_rate);
        self.treble_gain.set_sample_rate(sample_rate);
        self.needs_update = true;
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.bass_l.clear();
        self.bass_r.clear();
        self.mid_l.clear();
        self.mid_r.clear();
        self.treble_l.clear();
        self.treble_r.clear();
        self.bass_gain.snap_to_target();
        self.mid_gain.snap_to_target();
        self.treble_gain.snap_to_target();
        self.needs_update = true;
        self.update_coefficients();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_eq_passes_signal() {
        let mut eq = ThreeBandEq::new(44100.0);

        let mut l = 0.0;
        for _ in 0..1000 {
            (l, _) = eq.process(0.5, 0.5);
        }

        assert!((l - 0.5).abs() < 0.05, "flat EQ should pass DC, got {}", l);
    }

    #[test]
    fn test_bass_boost_raises_dc() {
        let mut eq = ThreeBandEq::new(44100.0);
        eq.set_bass_db(6.0);
        eq.reset();

        // DC sits below the shelf corner, so a +6 dB shelf roughly doubles it
        let mut l = 0.0;
        for _ in 0..4000 {
            (l, _) = eq.process(0.5, 0.5);
        }

        let expected = 0.5 * libm::powf(10.0, 6.0 / 20.0);
        assert!(
            (l - expected).abs() < 0.1,
            "expected ~{}, got {}",
            expected,
            l
        );
    }

    #[test]
    fn test_treble_cut_attenuates_high_freq() {
        let mut eq = ThreeBandEq::new(44100.0);
        eq.set_treble_db(-24.0);
        eq.reset();

        // 10 kHz tone, well above the treble shelf corner
        let mut in_energy = 0.0;
        let mut out_energy = 0.0;
        for i in 0..8000 {
            let t = i as f32 / 44100.0;
            let x = libm::sinf(2.0 * core::f32::consts::PI * 10000.0 * t);
            let (l, _) = eq.process(x, x);
            if i >= 4000 {
                in_energy += x * x;
                out_energy += l * l;
            }
        }

        assert!(
            out_energy < in_energy * 0.1,
            "treble cut should attenuate 10 kHz: in={} out={}",
            in_energy,
            out_energy
        );
    }

    #[test]
    fn test_gain_clamped() {
        let mut eq = ThreeBandEq::new(44100.0);
        eq.set_bass_db(99.0);
        assert_eq!(eq.bass_db(), 24.0);
        eq.set_mid_db(-99.0);
        assert_eq!(eq.mid_db(), -24.0);
    }

    #[test]
    fn test_channels_independent() {
        let mut eq = ThreeBandEq::new(44100.0);
        eq.set_bass_db(6.0);
        eq.reset();

        let mut l = 0.0;
        let mut r = 0.0;
        for _ in 0..4000 {
            (l, r) = eq.process(0.5, 0.25);
        }

        // Same filter applied per channel: ratio preserved
        assert!((l / r - 2.0).abs() < 0.05, "expected ratio ~2, got {}", l / r);
    }

    #[test]
    fn test_output_finite_at_extremes() {
        let mut eq = ThreeBandEq::new(44100.0);
        eq.set_bass_db(24.0);
        eq.set_mid_db(24.0);
        eq.set_treble_db(24.0);

        for i in 0..4000 {
            let x = libm::sinf(i as f32 * 0.3);
            let (l, r) = eq.process(x, x);
            assert!(l.is_finite() && r.is_finite());
        }
    }
}
