//! Delay line for time-based effects.
//!
//! Provides a circular buffer-based delay line with linear interpolation
//! for fractional delay times. The echo path reads it at a fixed 300 ms
//! tap; fractional reads keep it artifact-free if the tap ever moves.
//!
//! # Memory
//!
//! The buffer is heap-allocated during construction but never reallocates.
//! No allocations occur during audio processing.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Interpolated delay line using a circular buffer.
///
/// Supports fractional delay times through linear interpolation, allowing
/// smooth changes of delay time without stair-step artifacts.
///
/// # Example
///
/// ```rust
/// use adagio_core::DelayLine;
///
/// // 500ms max delay at 44.1kHz
/// let max_delay_samples = (0.5 * 44100.0) as usize;
/// let mut delay = DelayLine::new(max_delay_samples);
///
/// delay.write(1.0);
/// let output = delay.read(10.5); // 10.5 sample delay (fractional)
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Write position in buffer
    write_pos: usize,
}

impl DelayLine {
    /// Creates a new delay line with the given maximum delay in samples.
    ///
    /// # Panics
    ///
    /// Panics if `max_delay_samples` is 0.
    pub fn new(max_delay_samples: usize) -> Self {
        assert!(max_delay_samples > 0, "Delay size must be > 0");

        Self {
            buffer: vec![0.0; max_delay_samples],
            write_pos: 0,
        }
    }

    /// Creates a delay line from sample rate and max delay time in seconds.
    pub fn from_time(sample_rate: f32, max_seconds: f32) -> Self {
        let max_samples = (sample_rate * max_seconds) as usize + 1;
        Self::new(max_samples)
    }

    /// Reads a delayed sample with linear interpolation.
    ///
    /// # Arguments
    ///
    /// * `delay_samples` - Delay time in samples (can be fractional)
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        debug_assert!(delay_samples >= 0.0);

        let len = self.buffer.len();
        let delay_clamped = delay_samples.min((len - 1) as f32);

        let delay_int = delay_clamped as usize;
        let frac = delay_clamped - delay_int as f32;

        // read_pos points to the sample `delay_int` samples before the last written.
        let read_pos = (self.write_pos + len - delay_int - 1) % len;
        let next_pos = (read_pos + len - 1) % len;

        let a = self.buffer[read_pos];
        let b = self.buffer[next_pos];
        a + (b - a) * frac
    }

    /// Writes a sample to the delay line and advances the write position.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Combined read and write operation.
    #[inline]
    pub fn read_write(&mut self, sample: f32, delay_samples: f32) -> f32 {
        let output = self.read(delay_samples);
        self.write(sample);
        output
    }

    /// Clears the delay line (sets all samples to 0).
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Returns the maximum delay capacity in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_delay() {
        let mut delay = DelayLine::new(100);

        // Write an impulse, then silence
        delay.write(1.0);
        for _ in 0..9 {
            delay.write(0.0);
        }

        // The impulse was written 10 samples ago
        assert!((delay.read(9.0) - 1.0).abs() < 1e-6);
        assert!(delay.read(8.0).abs() < 1e-6);
    }

    #[test]
    fn test_fractional_delay_interpolates() {
        let mut delay = DelayLine::new(100);

        delay.write(0.0);
        delay.write(1.0);

        // Halfway between the two written samples
        let mid = delay.read(0.5);
        assert!((mid - 0.5).abs() < 1e-6, "Expected 0.5, got {}", mid);
    }

    #[test]
    fn test_clear() {
        let mut delay = DelayLine::new(50);
        for _ in 0..50 {
            delay.write(0.7);
        }
        delay.clear();
        for d in 0..50 {
            assert_eq!(delay.read(d as f32), 0.0);
        }
    }

    #[test]
    fn test_read_clamps_to_capacity() {
        let mut delay = DelayLine::new(10);
        delay.write(1.0);
        // Requesting more delay than capacity must not panic
        let _ = delay.read(1000.0);
    }

    #[test]
    fn test_from_time() {
        let delay = DelayLine::from_time(44100.0, 0.3);
        assert!(delay.capacity() >= 13230);
    }

    #[test]
    #[should_panic]
    fn test_zero_capacity_panics() {
        let _ = DelayLine::new(0);
    }
}
