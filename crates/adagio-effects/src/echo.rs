//! Send-style feedback echo.
//!
//! Unlike an insert delay this stage returns only the wet signal; the
//! [`WetDryBus`](crate::bus::WetDryBus) sums it with the dry path. With the
//! default level of 0.0 the stage is silent until it is dialed in.

use adagio_core::{DelayLine, SmoothedValue, Stage, flush_denormal};

/// Longest supported echo time in seconds.
const MAX_ECHO_SECONDS: f32 = 2.0;

/// Feedback echo with independent left/right delay lines.
///
/// Defaults: 0.3 s delay, 0.3 feedback, level 0.0 (muted).
///
/// # Example
///
/// ```rust
/// use adagio_effects::Echo;
/// use adagio_core::Stage;
///
/// let mut echo = Echo::new(44100.0);
/// echo.set_level(0.5);
/// let (wet_l, wet_r) = echo.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Echo {
    delay_l: DelayLine,
    delay_r: DelayLine,
    delay_samples: SmoothedValue,
    feedback: SmoothedValue,
    level: SmoothedValue,
    delay_seconds: f32,
    sample_rate: f32,
}

impl Echo {
    /// Create an echo at the defaults (0.3 s, feedback 0.3, level 0).
    pub fn new(sample_rate: f32) -> Self {
        let delay_seconds = 0.3;
        Self {
            delay_l: DelayLine::from_time(sample_rate, MAX_ECHO_SECONDS),
            delay_r: DelayLine::from_time(sample_rate, MAX_ECHO_SECONDS),
            delay_samples: SmoothedValue::new(delay_seconds * sample_rate, sample_rate, 50.0),
            feedback: SmoothedValue::new(0.3, sample_rate, 10.0),
            level: SmoothedValue::new(0.0, sample_rate, 10.0),
            delay_seconds,
            sample_rate,
        }
    }

    /// Set the echo time in seconds (0.001 to 2.0).
    pub fn set_delay_seconds(&mut self, seconds: f32) {
        self.delay_seconds = seconds.clamp(0.001, MAX_ECHO_SECONDS);
        self.delay_samples
            .set_target(self.delay_seconds * self.sample_rate);
    }

    /// Get the echo time in seconds.
    pub fn delay_seconds(&self) -> f32 {
        self.delay_seconds
    }

    /// Set the feedback amount (0 to 0.95).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback.set_target(feedback.clamp(0.0, 0.95));
    }

    /// Get the feedback amount target.
    pub fn feedback(&self) -> f32 {
        self.feedback.target()
    }

    /// Set the wet output level (0 to 1; 0 mutes the echo path).
    pub fn set_level(&mut self, level: f32) {
        self.level.set_target(level.clamp(0.0, 1.0));
    }

    /// Get the wet output level target.
    pub fn level(&self) -> f32 {
        self.level.target()
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for Echo {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let delay_samples = self.delay_samples.advance();
        let feedback = self.feedback.advance();
        let level = self.level.advance();

        let delayed_l = self.delay_l.read(delay_samples);
        let delayed_r = self.delay_r.read(delay_samples);

        self.delay_l.write(flush_denormal(left + delayed_l * feedback));
        self.delay_r.write(flush_denormal(right + delayed_r * feedback));

        (delayed_l * level, delayed_r * level)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.delay_l = DelayLine::from_time(sample_rate, MAX_ECHO_SECONDS);
        self.delay_r = DelayLine::from_time(sample_rate, MAX_ECHO_SECONDS);
        self.delay_samples.set_sample_rate(sample_rate);
        self.delay_samples
            .set_immediate(self.delay_seconds * sample_rate);
        self.feedback.set_sample_rate(sample_rate);
        self.level.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.delay_l.clear();
        self.delay_r.clear();
        self.delay_samples.snap_to_target();
        self.feedback.snap_to_target();
        self.level.snap_to_target();
    }
}
