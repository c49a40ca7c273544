//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the processing stages, suitable for
//! `no_std` builds (all transcendentals go through `libm`).
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Rate Conversions
//!
//! - [`semitone_ratio`] - Musical pitch offset to playback-rate multiplier
//! - [`ms_to_samples`] - Time to sample-count conversion
//!
//! # Utilities
//!
//! - [`lerp`] - Linear interpolation
//! - [`mono_sum`] - Stereo to mono fold-down
//! - [`flush_denormal`] - Denormal protection for feedback paths

use libm::{exp2f, expf, logf};

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use adagio_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored to avoid -inf.
///
/// # Example
/// ```rust
/// use adagio_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert a pitch offset in semitones to a playback-rate multiplier.
///
/// `2^(semitones/12)`: +12 semitones doubles the rate, -12 halves it.
/// The engine approximates pitch change by scaling playback rate, so this
/// multiplier is applied on top of the speed parameter.
///
/// # Example
/// ```rust
/// use adagio_core::semitone_ratio;
///
/// assert!((semitone_ratio(12.0) - 2.0).abs() < 1e-6);
/// assert!((semitone_ratio(-12.0) - 0.5).abs() < 1e-6);
/// assert!((semitone_ratio(0.0) - 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn semitone_ratio(semitones: f32) -> f32 {
    exp2f(semitones / 12.0)
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Sum stereo to mono (equal average of both channels).
#[inline]
pub fn mono_sum(left: f32, right: f32) -> f32 {
    (left + right) * 0.5
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures. This function replaces values below
/// 1e-20 with zero, providing margin before the IEEE 754 subnormal range
/// begins.
///
/// Use this in feedback loops (the echo path, one-pole states) where signal
/// can decay indefinitely toward zero.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
