//! Core Stage trait for stereo processing.
//!
//! The [`Stage`] trait is the foundation of the processing chain. Every
//! effect in the chain implements it, providing a consistent interface for
//! single-frame and block-based processing.
//!
//! ## Design Decisions
//!
//! - **Stereo processing**: Stages take and return `(left, right)` pairs.
//!   The chain is stereo end-to-end — the panner, the width stage and the
//!   convolution reverb all need both channels at once, so a mono trait
//!   with a stereo bolt-on would leave half the chain on the awkward path.
//!
//! - **Object-safe**: The trait supports `dyn Stage`, which the chain uses
//!   to reset and re-rate all stages uniformly.
//!
//! - **No allocations**: All methods are designed to be called in real-time
//!   audio contexts with zero heap allocations.

/// Core trait for all stereo processing stages.
///
/// Stages process audio frames, either one at a time or in planar blocks.
///
/// # Example
///
/// ```rust
/// use adagio_core::Stage;
///
/// struct Trim {
///     gain: f32,
/// }
///
/// impl Stage for Trim {
///     fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
///         (left * self.gain, right * self.gain)
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {
///         // Trim doesn't depend on sample rate
///     }
///
///     fn reset(&mut self) {
///         // Trim has no internal state to reset
///     }
/// }
/// ```
pub trait Stage {
    /// Process a single stereo frame.
    ///
    /// This is the core processing function. For stages with internal state
    /// (filters, delays, envelopes), this advances the state by one frame.
    ///
    /// # Arguments
    /// * `left` - Left input sample, typically in range [-1.0, 1.0]
    /// * `right` - Right input sample
    ///
    /// # Returns
    /// Processed `(left, right)` output frame
    fn process(&mut self, left: f32, right: f32) -> (f32, f32);

    /// Process a planar block of frames in place.
    ///
    /// Default implementation calls [`process`](Self::process) per frame.
    /// Stages may override this for more efficient block processing (the
    /// convolver does, since it works in FFT-sized chunks).
    ///
    /// # Panics
    /// Default implementation debug-asserts `left.len() == right.len()`.
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) {
        debug_assert_eq!(
            left.len(),
            right.len(),
            "Channel buffers must have same length"
        );
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (ol, or) = self.process(*l, *r);
            *l = ol;
            *r = or;
        }
    }

    /// Update the sample rate.
    ///
    /// Called when the stage moves to a context with a different rate
    /// (live playback at the device rate vs. offline render at the asset
    /// rate). Stages recalculate any rate-dependent coefficients here.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state.
    ///
    /// Clears delay lines, filter history and envelopes without changing
    /// parameters. Called when a fresh playback source is wired in, so the
    /// tail of the previous source cannot bleed into the new one.
    fn reset(&mut self);

    /// Report processing latency in frames.
    ///
    /// Most stages have zero latency; the partitioned convolver is the
    /// exception (one FFT block). Default returns 0.
    fn latency_samples(&self) -> usize {
        0
    }
}
