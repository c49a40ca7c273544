//! Adagio Effects - processing stages for the adagio engine
//!
//! This crate provides the concrete stages the engine wires into its fixed
//! chain, all implementing the stereo [`Stage`](adagio_core::Stage) trait
//! from `adagio-core`:
//!
//! - [`ThreeBandEq`] - bass / mid / treble tone shaping
//! - [`LowPassFilter`] - cutoff-controlled low-pass
//! - [`Compressor`] - soft-knee dynamics compressor with linked stereo
//! - [`StereoPanner`] - equal-power stereo placement
//! - [`StereoWidth`] - mid/side width control
//! - [`Echo`] - send-style feedback echo
//! - [`ConvolutionReverb`] - partitioned FFT convolution against a generated
//!   [`ImpulseResponse`]
//! - [`WetDryBus`] - parallel dry / reverb / echo mix
//! - [`OutputLevel`] - master volume and fade gain
//!
//! Unlike `adagio-core` this crate requires `std`: the convolver plans its
//! FFTs through `rustfft`.
//!
//! ## Example
//!
//! ```rust
//! use adagio_core::Stage;
//! use adagio_effects::{ThreeBandEq, LowPassFilter};
//!
//! let mut eq = ThreeBandEq::new(44100.0);
//! eq.set_bass_db(3.0);
//! eq.set_treble_db(-2.0);
//!
//! let mut lp = LowPassFilter::new(44100.0);
//! lp.set_cutoff_hz(8000.0);
//!
//! let (l, r) = eq.process(0.5, 0.5);
//! let (l, r) = lp.process(l, r);
//! assert!(l.is_finite() && r.is_finite());
//! ```

pub mod bus;
pub mod compressor;
pub mod echo;
pub mod eq;
pub mod level;
pub mod lowpass;
pub mod panner;
pub mod reverb;
pub mod width;

// Re-export main types at crate root
pub use bus::WetDryBus;
pub use compressor::Compressor;
pub use echo::Echo;
pub use eq::ThreeBandEq;
pub use level::OutputLevel;
pub use lowpass::LowPassFilter;
pub use panner::StereoPanner;
pub use reverb::{ConvolutionReverb, ImpulseResponse};
pub use width::StereoWidth;
