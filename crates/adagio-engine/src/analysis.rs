//! Visualization tap: byte-scaled spectrum and waveform snapshots.
//!
//! The audio thread streams mono samples into a lock-free-enough ring
//! (a `try_lock` that skips a block under contention rather than ever
//! blocking the callback). Readers pull snapshots from the control
//! thread; the FFT, smoothing, and byte scaling all run on the reader
//! side so the audio callback stays allocation- and FFT-free.
//!
//! Byte contracts:
//! - Spectrum: 128 bins. Linear magnitude `|X[k]| / N` is smoothed with
//!   a 0.8 coefficient, converted to dB, and mapped from `[-100, -30]` dB
//!   onto `[0, 255]`.
//! - Waveform: 256 bytes, `clamp(128 * (1 + x), 0, 255)` per sample, so
//!   silence reads as 128.
//!
//! When nothing has been pushed (or after [`AnalysisTap::clear`]) the
//! spectrum is all zeros and the waveform all 128s.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};

/// Samples per analysis frame; also the waveform snapshot length.
pub const FFT_SIZE: usize = 256;
/// Spectrum bins exposed to readers (DC up to just below Nyquist).
pub const FREQUENCY_BINS: usize = FFT_SIZE / 2;
/// Smoothing applied to linear magnitudes between snapshots.
const SMOOTHING: f32 = 0.8;
/// Magnitude mapped to byte 0.
const DB_MIN: f32 = -100.0;
/// Magnitude mapped to byte 255.
const DB_MAX: f32 = -30.0;

/// Write side: the most recent [`FFT_SIZE`] mono samples.
struct TapWindow {
    ring: [f32; FFT_SIZE],
    /// Next write index, which is also the oldest sample.
    pos: usize,
    /// Bumped once per pushed block so readers can skip stale recomputes.
    generation: u64,
}

/// Read side: smoothed magnitudes and the published byte arrays.
struct ReaderState {
    smoothed: [f32; FREQUENCY_BINS],
    frequency_bytes: [u8; FREQUENCY_BINS],
    waveform_bytes: [u8; FFT_SIZE],
    /// Generation the byte arrays were computed from.
    seen_generation: u64,
}

impl ReaderState {
    fn idle() -> Self {
        Self {
            smoothed: [0.0; FREQUENCY_BINS],
            frequency_bytes: [0; FREQUENCY_BINS],
            waveform_bytes: [128; FFT_SIZE],
            seen_generation: 0,
        }
    }
}

/// Shared analysis tap between the audio callback and control thread.
pub struct AnalysisTap {
    window: Mutex<TapWindow>,
    reader: Mutex<ReaderState>,
    fft: Arc<dyn Fft<f32>>,
    blackman: [f32; FFT_SIZE],
}

impl AnalysisTap {
    /// A tap in the idle state.
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let mut blackman = [0.0f32; FFT_SIZE];
        let denom = (FFT_SIZE - 1) as f32;
        for (i, w) in blackman.iter_mut().enumerate() {
            let x = 2.0 * PI * i as f32 / denom;
            *w = 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos();
        }

        Self {
            window: Mutex::new(TapWindow {
                ring: [0.0; FFT_SIZE],
                pos: 0,
                generation: 0,
            }),
            reader: Mutex::new(ReaderState::idle()),
            fft,
            blackman,
        }
    }

    /// Feed mono samples from the audio callback.
    ///
    /// Never blocks: if a reader holds the window the block is dropped.
    pub fn push_block(&self, mono: &[f32]) {
        if mono.is_empty() {
            return;
        }
        let Ok(mut guard) = self.window.try_lock() else {
            return;
        };
        let window = &mut *guard;
        for &sample in mono {
            window.ring[window.pos] = sample;
            window.pos = (window.pos + 1) % FFT_SIZE;
        }
        window.generation = window.generation.wrapping_add(1);
    }

    /// Current spectrum as 128 bytes.
    pub fn frequency_snapshot(&self) -> [u8; FREQUENCY_BINS] {
        let Ok(mut reader) = self.reader.lock() else {
            return [0; FREQUENCY_BINS];
        };
        self.refresh(&mut reader);
        reader.frequency_bytes
    }

    /// Current waveform as 256 bytes.
    pub fn waveform_snapshot(&self) -> [u8; FFT_SIZE] {
        let Ok(mut reader) = self.reader.lock() else {
            return [128; FFT_SIZE];
        };
        self.refresh(&mut reader);
        reader.waveform_bytes
    }

    /// Drop back to the idle patterns and forget all smoothing state.
    ///
    /// Locks are taken reader-then-window, the same order as the
    /// snapshot path.
    pub fn clear(&self) {
        let Ok(mut reader) = self.reader.lock() else {
            return;
        };
        *reader = ReaderState::idle();
        if let Ok(mut window) = self.window.lock() {
            window.ring = [0.0; FFT_SIZE];
            window.pos = 0;
            let generation = window.generation.wrapping_add(1);
            window.generation = generation;
            reader.seen_generation = generation;
        }
    }

    /// Recompute the byte arrays if new audio arrived since the last
    /// snapshot. Repeated snapshots between blocks are idempotent, so
    /// smoothing advances once per block rather than once per read.
    fn refresh(&self, reader: &mut ReaderState) {
        let (samples, generation) = {
            let Ok(window) = self.window.lock() else {
                return;
            };
            let mut ordered = [0.0f32; FFT_SIZE];
            for (i, slot) in ordered.iter_mut().enumerate() {
                *slot = window.ring[(window.pos + i) % FFT_SIZE];
            }
            (ordered, window.generation)
        };
        if generation == reader.seen_generation {
            return;
        }
        reader.seen_generation = generation;

        for (byte, &sample) in reader.waveform_bytes.iter_mut().zip(samples.iter()) {
            *byte = (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8;
        }

        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .zip(self.blackman.iter())
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        for k in 0..FREQUENCY_BINS {
            let magnitude = buffer[k].norm() / FFT_SIZE as f32;
            reader.smoothed[k] = SMOOTHING * reader.smoothed[k] + (1.0 - SMOOTHING) * magnitude;
            let db = 20.0 * reader.smoothed[k].max(1e-10).log10();
            let scaled = (db - DB_MIN) / (DB_MAX - DB_MIN) * 255.0;
            reader.frequency_bytes[k] = scaled.clamp(0.0, 255.0) as u8;
        }
    }
}

impl Default for AnalysisTap {
    fn default() -> Self {
        Self::new()
    }
}
