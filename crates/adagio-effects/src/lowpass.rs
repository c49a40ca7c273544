//! Low-pass tone filter.

use adagio_core::{Biquad, SmoothedValue, Stage, lowpass_coefficients};

/// Butterworth Q: maximally flat passband, no resonant peak.
const TONE_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Low-pass filter with a smoothed cutoff control.
///
/// A tone control rather than a synth filter: Q is fixed at 0.707 and only
/// the cutoff moves. At the default 20 kHz cutoff the stage is audibly
/// transparent.
///
/// # Example
///
/// ```rust
/// use adagio_effects::LowPassFilter;
/// use adagio_core::Stage;
///
/// let mut lp = LowPassFilter::new(44100.0);
/// lp.set_cutoff_hz(3000.0);
/// let (l, r) = lp.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    biquad_l: Biquad,
    biquad_r: Biquad,
    cutoff: SmoothedValue,
    sample_rate: f32,
    needs_update: bool,
}

impl LowPassFilter {
    /// Create a low-pass filter with the cutoff parked at 20 kHz.
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            biquad_l: Biquad::new(),
            biquad_r: Biquad::new(),
            cutoff: SmoothedValue::new(20_000.0_f32.min(sample_rate * 0.49), sample_rate, 20.0),
            sample_rate,
            needs_update: true,
        };
        filter.update_coefficients();
        filter
    }

    /// Set cutoff frequency in Hz, clamped to [20, 0.49 x sample rate].
    pub fn set_cutoff_hz(&mut self, cutoff: f32) {
        let clamped = cutoff.clamp(20.0, self.sample_rate * 0.49);
        self.cutoff.set_target(clamped);
        self.needs_update = true;
    }

    /// Get the cutoff target in Hz.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff.target()
    }

    fn update_coefficients(&mut self) {
        let (b0, b1, b2, a0, a1, a2) =
            lowpass_coefficients(self.cutoff.get(), TONE_Q, self.sample_rate);
        self.biquad_l.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.biquad_r.set_coefficients(b0, b1, b2, a0, a1, a2);
        self.needs_update = false;
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for LowPassFilter {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        self.cutoff.advance();

        if self.needs_update || !self.cutoff.is_settled() {
            self.update_coefficients();
        }

        (self.biquad_l.process(left), self.biquad_r.process(right))
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff.set_sample_rate(sample_rate);
        // A cutoff valid at the old rate may sit above the new Nyquist
        let clamped = self.cutoff.target().clamp(20.0, sample_rate * 0.49);
        self.cutoff.set_target(clamped);
        self.needs_update = true;
        self.update_coefficients();
    }

    fn reset(&mut self) {
        self.biquad_l.clear();
        self.biquad_r.clear();
        self.cutoff.snap_to_target();
        self.needs_update = true;
        self.update_coefficients();
    }
}
