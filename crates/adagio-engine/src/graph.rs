//! Fixed stereo processing chain and its parameter mapping.
//!
//! Stage order is source -> EQ -> low-pass -> compressor -> panner ->
//! width -> wet/dry bus -> output level. The chain owns the mapping from
//! user-facing parameter values to stage settings; stages themselves only
//! see concrete dB, Hz, and ratio values.

use crate::params::{EchoSettings, ParameterSet};
use adagio_core::Stage;
use adagio_effects::{
    Compressor, ImpulseResponse, LowPassFilter, OutputLevel, StereoPanner, StereoWidth,
    ThreeBandEq, WetDryBus,
};

/// Compressor threshold at zero compression amount, in dB.
const COMPRESSOR_MIN_THRESHOLD_DB: f32 = -24.0;
/// Compressor threshold at full compression amount, in dB.
const COMPRESSOR_MAX_THRESHOLD_DB: f32 = -4.0;
/// Compressor ratio at full compression amount.
const COMPRESSOR_MAX_RATIO: f32 = 20.0;

/// The full per-session effect chain.
#[derive(Clone)]
pub(crate) struct SignalChain {
    eq: ThreeBandEq,
    lowpass: LowPassFilter,
    compressor: Compressor,
    panner: StereoPanner,
    width: StereoWidth,
    bus: WetDryBus,
    level: OutputLevel,
    sample_rate: f32,
    /// Room size the current impulse response was generated for.
    ir_room_size: f32,
    /// Decay time the current impulse response was generated for.
    ir_decay_time: f32,
}

impl SignalChain {
    /// Build a chain at `sample_rate` with `params` and `echo` applied
    /// and all smoothers settled at their targets.
    pub(crate) fn build(params: &ParameterSet, echo: &EchoSettings, sample_rate: f32) -> Self {
        let ir = ImpulseResponse::generate(params.room_size, params.decay_time, sample_rate);
        let mut chain = Self {
            eq: ThreeBandEq::new(sample_rate),
            lowpass: LowPassFilter::new(sample_rate),
            compressor: Compressor::new(sample_rate),
            panner: StereoPanner::new(sample_rate),
            width: StereoWidth::new(sample_rate),
            bus: WetDryBus::new(sample_rate, &ir),
            level: OutputLevel::new(sample_rate),
            sample_rate,
            ir_room_size: params.room_size,
            ir_decay_time: params.decay_time,
        };
        chain.apply(params);
        chain.set_echo(echo);
        chain.reset();
        chain
    }

    /// Push a parameter set into the stages.
    ///
    /// The impulse response is regenerated only when the room size or
    /// decay time actually changed; everything else updates in place and
    /// glides via the stages' own smoothing.
    pub(crate) fn apply(&mut self, params: &ParameterSet) {
        self.eq.set_bass_db(params.bass_gain);
        self.eq.set_mid_db(params.mid_gain);
        self.eq.set_treble_db(params.treble_gain);
        self.lowpass.set_cutoff_hz(params.low_pass_freq);

        let amount = params.compression / 100.0;
        let threshold = COMPRESSOR_MIN_THRESHOLD_DB
            + amount * (COMPRESSOR_MAX_THRESHOLD_DB - COMPRESSOR_MIN_THRESHOLD_DB);
        self.compressor.set_threshold_db(threshold);
        self.compressor.set_ratio(1.0 + amount * (COMPRESSOR_MAX_RATIO - 1.0));

        self.panner.set_pan(params.pan_position / 100.0);
        self.width.set_width(params.stereo_width / 100.0);
        self.bus.set_reverb_mix(params.reverb_amount / 100.0);
        self.level.set_volume(params.volume / 100.0);

        if params.room_size != self.ir_room_size || params.decay_time != self.ir_decay_time {
            let ir =
                ImpulseResponse::generate(params.room_size, params.decay_time, self.sample_rate);
            self.bus.set_impulse_response(&ir);
            self.ir_room_size = params.room_size;
            self.ir_decay_time = params.decay_time;
        }
    }

    /// Push echo settings into the wet/dry bus.
    pub(crate) fn set_echo(&mut self, echo: &EchoSettings) {
        self.bus
            .set_echo(echo.delay_seconds, echo.feedback, echo.level);
    }

    /// Clear all stage state and snap smoothers to their targets.
    pub(crate) fn reset(&mut self) {
        self.eq.reset();
        self.lowpass.reset();
        self.compressor.reset();
        self.panner.reset();
        self.width.reset();
        self.bus.reset();
        self.level.reset();
    }

    /// Run one stereo frame through every stage in order.
    #[inline]
    pub(crate) fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let (l, r) = self.eq.process(left, right);
        let (l, r) = self.lowpass.process(l, r);
        let (l, r) = self.compressor.process(l, r);
        let (l, r) = self.panner.process(l, r);
        let (l, r) = self.width.process(l, r);
        let (l, r) = self.bus.process(l, r);
        self.level.process(l, r)
    }

    /// Start ramping the fade gain toward `target` over `seconds`.
    pub(crate) fn begin_fade(&mut self, target: f32, seconds: f32) {
        self.level.begin_fade(target, seconds);
    }

    /// Drop the fade gain to silence, then ramp it up over `seconds`.
    pub(crate) fn fade_in_from_silence(&mut self, seconds: f32) {
        self.level.set_fade_immediate(0.0);
        self.level.begin_fade(1.0, seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 44_100.0;

    #[test]
    fn test_default_chain_is_near_transparent() {
        let params = ParameterSet::default();
        let echo = EchoSettings::default();
        let mut chain = SignalChain::build(&params, &echo, SAMPLE_RATE);

        // Defaults: flat EQ, open low-pass, 1:1 compression, centered pan,
        // unity width, zero reverb mix, unity volume. Run long enough for
        // filters to settle on a DC input.
        let mut out = (0.0, 0.0);
        for _ in 0..20_000 {
            out = chain.process(0.5, 0.5);
        }
        assert!((out.0 - 0.5).abs() < 0.01, "left was {}", out.0);
        assert!((out.1 - 0.5).abs() < 0.01, "right was {}", out.1);
    }

    #[test]
    fn test_compression_amount_maps_to_threshold_and_ratio() {
        let mut params = ParameterSet::default();
        let echo = EchoSettings::default();

        params.compression = 0.0;
        let chain = SignalChain::build(&params, &echo, SAMPLE_RATE);
        assert_eq!(chain.compressor.threshold_db(), -24.0);
        assert_eq!(chain.compressor.ratio(), 1.0);

        params.compression = 100.0;
        let chain = SignalChain::build(&params, &echo, SAMPLE_RATE);
        assert_eq!(chain.compressor.threshold_db(), -4.0);
        assert_eq!(chain.compressor.ratio(), 20.0);

        params.compression = 50.0;
        let chain = SignalChain::build(&params, &echo, SAMPLE_RATE);
        assert_eq!(chain.compressor.threshold_db(), -14.0);
        assert_eq!(chain.compressor.ratio(), 10.5);
    }

    #[test]
    fn test_percentage_knobs_are_normalized() {
        let params = ParameterSet {
            pan_position: -100.0,
            stereo_width: 200.0,
            reverb_amount: 35.0,
            volume: 150.0,
            ..ParameterSet::default()
        };
        let echo = EchoSettings::default();

        let chain = SignalChain::build(&params, &echo, SAMPLE_RATE);
        assert_eq!(chain.panner.pan(), -1.0);
        assert_eq!(chain.width.width(), 2.0);
        assert_eq!(chain.bus.reverb_mix(), 0.35);
        assert_eq!(chain.level.volume(), 1.5);
    }

    #[test]
    fn test_reapplying_same_reverb_knobs_keeps_the_ir() {
        let params = ParameterSet::default();
        let echo = EchoSettings::default();
        let mut chain = SignalChain::build(&params, &echo, SAMPLE_RATE);

        chain.apply(&params);
        assert_eq!(chain.ir_room_size, params.room_size);

        let mut changed = params;
        changed.room_size = 90.0;
        chain.apply(&changed);
        assert_eq!(chain.ir_room_size, 90.0);
    }

    #[test]
    fn test_volume_scales_output() {
        let params = ParameterSet {
            volume: 50.0,
            ..ParameterSet::default()
        };
        let echo = EchoSettings::default();
        let mut chain = SignalChain::build(&params, &echo, SAMPLE_RATE);

        let mut out = (0.0, 0.0);
        for _ in 0..20_000 {
            out = chain.process(0.5, 0.5);
        }
        assert!((out.0 - 0.25).abs() < 0.01, "left was {}", out.0);
    }

    #[test]
    fn test_fade_from_silence_starts_silent() {
        let params = ParameterSet::default();
        let echo = EchoSettings::default();
        let mut chain = SignalChain::build(&params, &echo, SAMPLE_RATE);

        chain.fade_in_from_silence(1.0);
        let (l, r) = chain.process(0.5, 0.5);
        assert!(l.abs() < 1e-3);
        assert!(r.abs() < 1e-3);
    }
}
