//! Peak envelope follower.
//!
//! Tracks the amplitude of a signal with independent attack and release
//! behavior. This is the detector stage of the dynamics compressor.

use libm::expf;

/// Peak envelope follower with separate attack and release times.
///
/// The follower rectifies its input and smooths it with a one-pole
/// filter whose coefficient depends on whether the signal is rising
/// (attack) or falling (release).
///
/// # Example
///
/// ```rust
/// use adagio_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(44100.0);
/// env.set_attack_ms(3.0);
/// env.set_release_ms(250.0);
///
/// let level = env.process(0.5);
/// assert!(level > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create a follower with 10 ms attack and 100 ms release.
    pub fn new(sample_rate: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms: 10.0,
            release_ms: 100.0,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Set the attack time in milliseconds (floored at 0.1 ms).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(0.1);
        self.recalculate_coefficients();
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds (floored at 1 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(1.0);
        self.recalculate_coefficients();
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update the sample rate and recalculate both coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Feed one sample and return the updated envelope level.
    ///
    /// The returned level is always non-negative.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();

        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        // y[n] = coeff * y[n-1] + (1 - coeff) * |x[n]|
        self.envelope = coeff * self.envelope + (1.0 - coeff) * input_abs;
        self.envelope
    }

    /// Current envelope level without consuming a sample.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        // coeff = exp(-1 / (time_ms * sample_rate / 1000))
        self.attack_coeff = expf(-1.0 / (self.attack_ms * self.sample_rate / 1000.0));
        self.release_coeff = expf(-1.0 / (self.release_ms * self.sample_rate / 1000.0));
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_rises_toward_input() {
        let mut env = EnvelopeFollower::new(44100.0);
        env.set_attack_ms(1.0);

        let mut level = 0.0;
        for _ in 0..500 {
            level = env.process(1.0);
        }

        assert!(level > 0.9, "envelope should approach 1.0, got {}", level);
    }

    #[test]
    fn test_release_falls_after_silence() {
        let mut env = EnvelopeFollower::new(44100.0);
        env.set_attack_ms(1.0);
        env.set_release_ms(10.0);

        for _ in 0..500 {
            env.process(1.0);
        }

        let mut level = 0.0;
        for _ in 0..1000 {
            level = env.process(0.0);
        }

        assert!(level < 0.15, "envelope should decay, got {}", level);
    }

    #[test]
    fn test_rectifies_negative_input() {
        let mut env = EnvelopeFollower::new(44100.0);
        env.set_attack_ms(1.0);

        let level = env.process(-0.5);
        assert!(level > 0.0);
    }

    #[test]
    fn test_reset() {
        let mut env = EnvelopeFollower::new(44100.0);
        for _ in 0..100 {
            env.process(1.0);
        }

        env.reset();
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn test_attack_slower_than_instant() {
        let mut env = EnvelopeFollower::new(44100.0);
        env.set_attack_ms(50.0);

        let level = env.process(1.0);
        assert!(
            level < 0.1,
            "slow attack should not jump to input, got {}",
            level
        );
    }
}
