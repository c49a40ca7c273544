//! Parallel wet/dry mix bus.
//!
//! Splits the signal three ways and sums the results:
//!
//! ```text
//!        ┌─ dry gain (1 - mix) ──────────┐
//! in ────┼─ convolver ── wet gain (mix) ─┼── out
//!        └─ echo (self-leveled) ─────────┘
//! ```
//!
//! The echo path carries its own level control and defaults to silent, so
//! the bus collapses to a classic wet/dry reverb mix until the echo is
//! dialed in.

use crate::echo::Echo;
use crate::reverb::{ConvolutionReverb, ImpulseResponse};
use adagio_core::{SmoothedValue, Stage};

/// Dry / reverb / echo mix stage.
///
/// The reverb mix is a single control: wet gain `mix`, dry gain `1 - mix`.
/// The wet path arrives one convolver block late, which reads as a short
/// pre-delay rather than a flaw.
///
/// # Example
///
/// ```rust
/// use adagio_effects::{ImpulseResponse, WetDryBus};
/// use adagio_core::Stage;
///
/// let ir = ImpulseResponse::generate(50.0, 0.5, 44100.0);
/// let mut bus = WetDryBus::new(44100.0, &ir);
/// bus.set_reverb_mix(0.4);
/// let (l, r) = bus.process(0.5, 0.5);
/// ```
#[derive(Clone)]
pub struct WetDryBus {
    reverb: ConvolutionReverb,
    echo: Echo,
    dry: SmoothedValue,
    wet: SmoothedValue,
}

impl WetDryBus {
    /// Create a bus that starts fully dry.
    pub fn new(sample_rate: f32, ir: &ImpulseResponse) -> Self {
        Self {
            reverb: ConvolutionReverb::new(ir),
            echo: Echo::new(sample_rate),
            dry: SmoothedValue::new(1.0, sample_rate, 10.0),
            wet: SmoothedValue::new(0.0, sample_rate, 10.0),
        }
    }

    /// Set the reverb mix (0 = dry, 1 = fully wet). Clamped to [0, 1].
    pub fn set_reverb_mix(&mut self, mix: f32) {
        let mix = mix.clamp(0.0, 1.0);
        self.wet.set_target(mix);
        self.dry.set_target(1.0 - mix);
    }

    /// Get the reverb mix target.
    pub fn reverb_mix(&self) -> f32 {
        self.wet.target()
    }

    /// Swap the convolver's impulse response.
    pub fn set_impulse_response(&mut self, ir: &ImpulseResponse) {
        self.reverb.set_impulse_response(ir);
    }

    /// Configure the echo path in one call.
    pub fn set_echo(&mut self, delay_seconds: f32, feedback: f32, level: f32) {
        self.echo.set_delay_seconds(delay_seconds);
        self.echo.set_feedback(feedback);
        self.echo.set_level(level);
    }

    /// The echo stage, for inspection.
    pub fn echo(&self) -> &Echo {
        &self.echo
    }
}

impl Stage for WetDryBus {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let dry_gain = self.dry.advance();
        let wet_gain = self.wet.advance();

        let (rev_l, rev_r) = self.reverb.process(left, right);
        let (echo_l, echo_r) = self.echo.process(left, right);

        (
            left * dry_gain + rev_l * wet_gain + echo_l,
            right * dry_gain + rev_r * wet_gain + echo_r,
        )
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.echo.set_sample_rate(sample_rate);
        self.dry.set_sample_rate(sample_rate);
        self.wet.set_sample_rate(sample_rate);
        // The convolver follows the response, which the owner regenerates
        // per rate
    }

    fn reset(&mut self) {
        self.reverb.reset();
        self.echo.reset();
        self.dry.snap_to_target();
        self.wet.snap_to_target();
    }

    fn latency_samples(&self) -> usize {
        // The dry path is not delayed
        0
    }
}
