//! Adagio Core - DSP primitives for the adagio processing chain
//!
//! This crate provides the foundational building blocks the adagio engine
//! assembles into its effect chain, designed for real-time processing with
//! zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Stage System
//!
//! - [`Stage`] - Object-safe trait for stereo processing stages
//!
//! The chain this engine builds is stereo end-to-end (pan, width and the
//! convolution reverb are inherently two-channel), so stages process sample
//! pairs rather than mono samples.
//!
//! ## Parameter Smoothing
//!
//! Zipper-free parameter changes for click-free automation:
//!
//! - [`SmoothedValue`] - Exponential smoothing (RC-like response)
//! - [`LinearRamp`] - Linear ramps with a fixed transition time (crossfades,
//!   fade-in/fade-out)
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR filter with RBJ cookbook coefficients
//!   (low-pass, peaking, low/high shelf)
//! - [`OnePole`] - 6 dB/oct lowpass for tone shaping and feedback damping
//!
//! ## Delay Lines
//!
//! - [`DelayLine`] - Variable-length delay with linear interpolation
//!
//! ## Dynamics
//!
//! - [`EnvelopeFollower`] - Peak detector with attack/release smoothing
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`semitone_ratio`],
//!   [`flush_denormal`], etc.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! adagio-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod envelope;
pub mod math;
pub mod one_pole;
pub mod smooth;
pub mod stage;

// Re-export main types at crate root
pub use biquad::{
    Biquad, high_shelf_coefficients, low_shelf_coefficients, lowpass_coefficients,
    peaking_eq_coefficients,
};
pub use delay::DelayLine;
pub use envelope::EnvelopeFollower;
pub use math::{
    db_to_linear, flush_denormal, lerp, linear_to_db, mono_sum, ms_to_samples, semitone_ratio,
};
pub use one_pole::OnePole;
pub use smooth::{LinearRamp, SmoothedValue};
pub use stage::Stage;
