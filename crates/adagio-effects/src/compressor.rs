//! Dynamics compressor with a wide soft knee.
//!
//! # Signal Flow
//!
//! ```text
//! L/R → mono sum → Envelope Follower → Gain Computer → shared gain → L/R
//! ```
//!
//! The envelope is detected from the mid signal `(L + R) / 2` and the same
//! gain is applied to both channels, so compression never shifts the stereo
//! image.

use adagio_core::{EnvelopeFollower, Stage, db_to_linear, linear_to_db, mono_sum};

/// Soft knee width in dB. Fixed: the knee is wide enough that the
/// compressor behaves musically across the whole threshold range.
const KNEE_DB: f32 = 30.0;

/// Default attack time in milliseconds.
const DEFAULT_ATTACK_MS: f32 = 3.0;

/// Default release time in milliseconds.
const DEFAULT_RELEASE_MS: f32 = 250.0;

/// Feed-forward dynamics compressor with linked-stereo detection.
///
/// Threshold and ratio are the driving controls; knee, attack and release
/// are fixed at program-material defaults (30 dB knee, 3 ms attack,
/// 250 ms release).
///
/// # Example
///
/// ```rust
/// use adagio_effects::Compressor;
/// use adagio_core::Stage;
///
/// let mut comp = Compressor::new(44100.0);
/// comp.set_threshold_db(-20.0);
/// comp.set_ratio(8.0);
///
/// let (l, r) = comp.process(0.5, 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    envelope_follower: EnvelopeFollower,
    threshold_db: f32,
    ratio: f32,
    sample_rate: f32,
    /// Last computed gain reduction in dB (always non-positive).
    last_gain_reduction_db: f32,
}

impl Compressor {
    /// Create a compressor at unity ratio (no compression).
    pub fn new(sample_rate: f32) -> Self {
        let mut envelope_follower = EnvelopeFollower::new(sample_rate);
        envelope_follower.set_attack_ms(DEFAULT_ATTACK_MS);
        envelope_follower.set_release_ms(DEFAULT_RELEASE_MS);

        Self {
            envelope_follower,
            threshold_db: -24.0,
            ratio: 1.0,
            sample_rate,
            last_gain_reduction_db: 0.0,
        }
    }

    /// Set threshold in dB (-60 to 0).
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.threshold_db = threshold_db.clamp(-60.0, 0.0);
    }

    /// Get the threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Set compression ratio (1:1 to 20:1).
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Get the compression ratio.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    /// Last computed gain reduction in dB (always non-positive).
    ///
    /// 0.0 means no compression is occurring; -6.0 means the signal is
    /// currently being reduced by 6 dB.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_reduction_db
    }

    #[inline]
    fn compute_gain_db(&self, input_db: f32) -> f32 {
        let overshoot = input_db - self.threshold_db;
        let half_knee = KNEE_DB / 2.0;

        if overshoot <= -half_knee {
            0.0
        } else if overshoot >= half_knee {
            -(overshoot * (1.0 - 1.0 / self.ratio))
        } else {
            // Quadratic knee: slope-continuous at both edges, and the
            // reduction never goes positive
            let t = overshoot + half_knee;
            -((1.0 - 1.0 / self.ratio) * t * t / (2.0 * KNEE_DB))
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(44100.0)
    }
}

impl Stage for Compressor {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let envelope = self.envelope_follower.process(mono_sum(left, right));
        let envelope_db = linear_to_db(envelope);
        let gain_reduction_db = self.compute_gain_db(envelope_db);
        self.last_gain_reduction_db = gain_reduction_db;
        let gain = db_to_linear(gain_reduction_db);

        (left * gain, right * gain)
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope_follower.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.envelope_follower.reset();
        self.last_gain_reduction_db = 0.0;
    }
}
