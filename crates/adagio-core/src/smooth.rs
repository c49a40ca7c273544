//! Parameter smoothing for zipper-free changes.
//!
//! Audio parameters (gain, pan, cutoff) need smooth transitions to avoid
//! audible "zipper noise" when values change. Two smoothers cover the two
//! shapes the chain needs:
//!
//! - **[`SmoothedValue`]** — exponential (one-pole lowpass) approach; natural
//!   decay, good for most parameters.
//! - **[`LinearRamp`]** — constant rate of change over a configurable
//!   transition time; the crossfade and the offline fade-in/fade-out both
//!   want exact arrival, which exponential smoothing never provides.

use libm::expf;

/// A parameter with exponential (one-pole) smoothing.
///
/// Each call to [`advance`](Self::advance) moves the current value a fixed
/// fraction of the way to the target, giving an RC-like response.
#[derive(Debug, Clone)]
pub struct SmoothedValue {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (1 = instant, ~0 = very slow)
    coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Smoothing time in milliseconds
    smoothing_time_ms: f32,
}

impl SmoothedValue {
    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial parameter value
    /// * `sample_rate` - Sample rate in Hz
    /// * `smoothing_time_ms` - Time constant in milliseconds (0 = instant)
    pub fn new(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate,
            smoothing_time_ms,
        };
        param.recalculate_coeff();
        param
    }

    /// Set the target value (the parameter will smooth towards this).
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Set target and immediately snap to it (no smoothing).
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Update sample rate and recalculate the smoothing coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Get the next smoothed value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        // One-pole lowpass: y[n] = y[n-1] + coeff * (target - y[n-1])
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Get the current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get the target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the value has reached its target (within epsilon).
    #[inline]
    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < 1e-6
    }

    /// Skip ahead to the target value immediately.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    /// Recalculate the smoothing coefficient from sample rate and time.
    ///
    /// A one-pole lowpass `y[n] = y[n-1] + coeff * (target - y[n-1])` has
    /// time constant tau (time to reach 63.2% of target) related to the
    /// coefficient by `coeff = 1 - exp(-1 / (tau * sample_rate))`. After
    /// 5*tau, the parameter reaches 99.3% of the target — effectively
    /// settled for audio purposes.
    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0; // Instant
        } else {
            let samples = self.smoothing_time_ms / 1000.0 * self.sample_rate;
            self.coeff = 1.0 - expf(-1.0 / samples);
        }
    }
}

/// A parameter with linear smoothing (constant rate of change).
///
/// Unlike exponential smoothing, a linear ramp reaches its target in exactly
/// the configured transition time. The crossfade deck drives the session fade
/// gain with one of these so complementary ramps sum to unity throughout.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Increment per sample (can be positive or negative)
    increment: f32,
    /// Samples remaining until target reached
    samples_remaining: u32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Transition time in seconds
    transition_secs: f32,
}

impl LinearRamp {
    /// Create a ramp holding `initial`, transitioning over `transition_secs`.
    pub fn new(initial: f32, sample_rate: f32, transition_secs: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            sample_rate,
            transition_secs,
        }
    }

    /// Set the target value; the ramp restarts from the current value.
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < 1e-9 {
            return; // Same target, no change needed
        }

        self.target = target;

        let samples = (self.transition_secs * self.sample_rate) as u32;
        if samples == 0 {
            self.current = target;
            self.increment = 0.0;
            self.samples_remaining = 0;
        } else {
            self.increment = (target - self.current) / samples as f32;
            self.samples_remaining = samples;
        }
    }

    /// Set value immediately, cancelling any ramp in progress.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }

    /// Update sample rate. Affects transitions started after this call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Set the transition time for subsequent [`set_target`](Self::set_target) calls.
    pub fn set_transition_secs(&mut self, secs: f32) {
        self.transition_secs = secs;
    }

    /// Get next smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target; // Snap to exact target
            }
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Check if the transition is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Snap to the target immediately, cancelling any ramp in progress.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothed_instant_when_no_smoothing() {
        let mut param = SmoothedValue::new(1.0, 48000.0, 0.0);
        param.set_target(0.5);
        let val = param.advance();
        assert!((val - 0.5).abs() < 1e-6, "Should snap instantly");
    }

    #[test]
    fn smoothed_converges() {
        let mut param = SmoothedValue::new(0.0, 48000.0, 10.0);
        param.set_target(1.0);

        // Run for 50ms (5x the time constant) - should be very close
        for _ in 0..(48000 * 50 / 1000) {
            param.advance();
        }

        assert!(
            (param.get() - 1.0).abs() < 0.01,
            "Should converge to target, got {}",
            param.get()
        );
    }

    #[test]
    fn smoothed_gradual_approach() {
        let mut param = SmoothedValue::new(0.0, 48000.0, 10.0);
        param.set_target(1.0);

        // After one time constant (~10ms), should be about 63% of the way
        let samples = (48000.0 * 0.010) as usize;
        for _ in 0..samples {
            param.advance();
        }

        let expected = 1.0 - expf(-1.0); // ~0.632
        assert!(
            (param.get() - expected).abs() < 0.05,
            "After one time constant, expected ~{}, got {}",
            expected,
            param.get()
        );
    }

    #[test]
    fn linear_ramp_exact_time() {
        let mut ramp = LinearRamp::new(0.0, 48000.0, 0.010);
        ramp.set_target(1.0);

        // Run for exactly 10ms
        let samples = (48000.0 * 0.010) as usize;
        for _ in 0..samples {
            ramp.advance();
        }

        assert!(
            (ramp.get() - 1.0).abs() < 1e-5,
            "Should reach target exactly, got {}",
            ramp.get()
        );
        assert!(ramp.is_settled());
    }

    #[test]
    fn linear_ramp_constant_rate() {
        let mut ramp = LinearRamp::new(0.0, 48000.0, 0.010);
        ramp.set_target(1.0);

        // After 5ms, should be halfway
        let samples = (48000.0 * 0.005) as usize;
        for _ in 0..samples {
            ramp.advance();
        }

        assert!(
            (ramp.get() - 0.5).abs() < 0.01,
            "Should be halfway, got {}",
            ramp.get()
        );
    }

    #[test]
    fn complementary_ramps_sum_to_unity() {
        // Two ramps with the same transition time, one 0->1, one 1->0,
        // must sum to 1 at every step. This is the crossfade invariant.
        let mut up = LinearRamp::new(0.0, 48000.0, 3.0);
        let mut down = LinearRamp::new(1.0, 48000.0, 3.0);
        up.set_target(1.0);
        down.set_target(0.0);

        for _ in 0..(48000 * 3) {
            let sum = up.advance() + down.advance();
            assert!((sum - 1.0).abs() < 1e-3, "Gains must sum to 1, got {}", sum);
        }
        assert!(up.is_settled() && down.is_settled());
    }
}
