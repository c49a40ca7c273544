//! Convolution reverb.
//!
//! Two pieces: a deterministic [`ImpulseResponse`] generator (exponentially
//! decaying filtered noise, parametrized by room size and decay time) and a
//! [`ConvolutionReverb`] stage that convolves the signal with that response
//! using uniform-partitioned FFT convolution.
//!
//! # Partitioned Convolution
//!
//! The impulse response is split into 512-sample partitions, each padded to
//! a 1024-point FFT. Input blocks are transformed once and pushed into a
//! frequency-domain delay line; each output block is the inverse transform
//! of the multiply-accumulate across all partitions, recombined by
//! overlap-add. Latency is one block (512 samples) regardless of response
//! length.

use adagio_core::{OnePole, Stage};
use libm::{powf, sqrtf};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Input block size in samples. One block of latency.
const BLOCK_SIZE: usize = 512;

/// FFT size: two blocks, so a block convolved with a partition fits
/// without circular wrap.
const FFT_SIZE: usize = 2 * BLOCK_SIZE;

/// Noise seed for the left channel.
const LEFT_SEED: u32 = 0x9E37_79B9;

/// Noise seed for the right channel.
const RIGHT_SEED: u32 = 0x7F4A_7C15;

#[inline]
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Procedurally generated stereo impulse response.
///
/// The response is white noise shaped by a squared decay envelope
/// `(1 - i/len)^2`, darkened by a one-pole low-pass whose cutoff falls as
/// the room size grows, and normalized to unit energy per channel so the
/// wet level stays comparable across decay lengths.
///
/// Generation is fully deterministic: the noise comes from fixed-seed
/// xorshift generators, so the same inputs always produce the same buffer.
///
/// # Example
///
/// ```rust
/// use adagio_effects::ImpulseResponse;
///
/// let ir = ImpulseResponse::generate(50.0, 2.0, 44100.0);
/// assert_eq!(ir.len(), 88200);
/// ```
#[derive(Debug, Clone)]
pub struct ImpulseResponse {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: f32,
}

impl ImpulseResponse {
    /// Generate a response.
    ///
    /// # Arguments
    /// * `room_size` - 0 (small, bright) to 100 (large, dark)
    /// * `decay_seconds` - tail length in seconds (0.1 to 10)
    /// * `sample_rate` - target sample rate in Hz
    pub fn generate(room_size: f32, decay_seconds: f32, sample_rate: f32) -> Self {
        let room = room_size.clamp(0.0, 100.0);
        let decay = decay_seconds.clamp(0.1, 10.0);
        let len = ((decay * sample_rate) as usize).max(1);

        // Larger rooms absorb more high frequency over the longer path:
        // cutoff slides from 10 kHz down to 1 kHz
        let cutoff = 10_000.0 * powf(10.0, -room / 100.0);

        let left = Self::generate_channel(LEFT_SEED, len, cutoff, sample_rate);
        let right = Self::generate_channel(RIGHT_SEED, len, cutoff, sample_rate);

        Self {
            left,
            right,
            sample_rate,
        }
    }

    fn generate_channel(seed: u32, len: usize, cutoff: f32, sample_rate: f32) -> Vec<f32> {
        let mut state = seed;
        let mut filter = OnePole::new(sample_rate, cutoff);
        let mut buffer = Vec::with_capacity(len);

        for i in 0..len {
            let noise = (xorshift32(&mut state) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let filtered = filter.process(noise);
            let env = 1.0 - i as f32 / len as f32;
            buffer.push(filtered * env * env);
        }

        // Unit energy so convolution level is decay-independent.
        // Accumulate in f64: the buffer can run to hundreds of thousands
        // of samples.
        let energy: f64 = buffer.iter().map(|&x| f64::from(x) * f64::from(x)).sum();
        if energy > f64::from(f32::EPSILON) {
            let scale = 1.0 / sqrtf(energy as f32);
            for x in &mut buffer {
                *x *= scale;
            }
        }

        buffer
    }

    /// Response length in samples.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if the response holds no samples.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Sample rate the response was generated for.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Left channel samples.
    pub fn left(&self) -> &[f32] {
        &self.left
    }

    /// Right channel samples.
    pub fn right(&self) -> &[f32] {
        &self.right
    }
}

/// Uniform-partitioned FFT convolution stage.
///
/// Convolves the left and right inputs with the corresponding channel of an
/// [`ImpulseResponse`]. The output is wet-only; dry mixing happens in the
/// [`WetDryBus`](crate::bus::WetDryBus).
#[derive(Clone)]
pub struct ConvolutionReverb {
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    /// Partition spectra per channel, oldest response segment last.
    partitions_l: Vec<Vec<Complex<f32>>>,
    partitions_r: Vec<Vec<Complex<f32>>>,
    /// Frequency-domain delay line of past input spectra (ring, newest at `head`).
    fdl_l: Vec<Vec<Complex<f32>>>,
    fdl_r: Vec<Vec<Complex<f32>>>,
    head: usize,
    input_l: Vec<f32>,
    input_r: Vec<f32>,
    output_l: Vec<f32>,
    output_r: Vec<f32>,
    tail_l: Vec<f32>,
    tail_r: Vec<f32>,
    pos: usize,
    scratch: Vec<Complex<f32>>,
    acc: Vec<Complex<f32>>,
}

impl ConvolutionReverb {
    /// Create a convolver for the given response.
    pub fn new(ir: &ImpulseResponse) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);
        let ifft = planner.plan_fft_inverse(FFT_SIZE);

        let mut reverb = Self {
            fft,
            ifft,
            partitions_l: Vec::new(),
            partitions_r: Vec::new(),
            fdl_l: Vec::new(),
            fdl_r: Vec::new(),
            head: 0,
            input_l: vec![0.0; BLOCK_SIZE],
            input_r: vec![0.0; BLOCK_SIZE],
            output_l: vec![0.0; BLOCK_SIZE],
            output_r: vec![0.0; BLOCK_SIZE],
            tail_l: vec![0.0; BLOCK_SIZE],
            tail_r: vec![0.0; BLOCK_SIZE],
            pos: 0,
            scratch: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            acc: vec![Complex::new(0.0, 0.0); FFT_SIZE],
        };
        reverb.set_impulse_response(ir);
        reverb
    }

    /// Swap in a new response, clearing all convolution state.
    ///
    /// The running tail is discarded, matching what swapping a convolver
    /// buffer does in a live graph.
    pub fn set_impulse_response(&mut self, ir: &ImpulseResponse) {
        self.partitions_l = self.partition_channel(ir.left());
        self.partitions_r = self.partition_channel(ir.right());

        let count = self.partitions_l.len();
        self.fdl_l = vec![vec![Complex::new(0.0, 0.0); FFT_SIZE]; count];
        self.fdl_r = vec![vec![Complex::new(0.0, 0.0); FFT_SIZE]; count];
        self.head = 0;
        self.clear_buffers();
    }

    /// Number of partitions the current response occupies.
    pub fn partition_count(&self) -> usize {
        self.partitions_l.len()
    }

    fn partition_channel(&mut self, samples: &[f32]) -> Vec<Vec<Complex<f32>>> {
        let mut partitions = Vec::new();

        for chunk in samples.chunks(BLOCK_SIZE) {
            for (i, slot) in self.scratch.iter_mut().enumerate() {
                let value = chunk.get(i).copied().unwrap_or(0.0);
                *slot = Complex::new(value, 0.0);
            }
            self.fft.process(&mut self.scratch);
            partitions.push(self.scratch.clone());
        }

        if partitions.is_empty() {
            partitions.push(vec![Complex::new(0.0, 0.0); FFT_SIZE]);
        }
        partitions
    }

    fn clear_buffers(&mut self) {
        self.input_l.fill(0.0);
        self.input_r.fill(0.0);
        self.output_l.fill(0.0);
        self.output_r.fill(0.0);
        self.tail_l.fill(0.0);
        self.tail_r.fill(0.0);
        self.pos = 0;
        for spectrum in self.fdl_l.iter_mut().chain(self.fdl_r.iter_mut()) {
            spectrum.fill(Complex::new(0.0, 0.0));
        }
    }

    fn run_block(&mut self) {
        let count = self.partitions_l.len();
        // Ring steps backward so `head + j` walks from newest to oldest
        self.head = (self.head + count - 1) % count;

        Self::convolve_channel(
            self.fft.as_ref(),
            self.ifft.as_ref(),
            &self.input_l,
            &mut self.fdl_l,
            &self.partitions_l,
            self.head,
            &mut self.output_l,
            &mut self.tail_l,
            &mut self.scratch,
            &mut self.acc,
        );
        Self::convolve_channel(
            self.fft.as_ref(),
            self.ifft.as_ref(),
            &self.input_r,
            &mut self.fdl_r,
            &self.partitions_r,
            self.head,
            &mut self.output_r,
            &mut self.tail_r,
            &mut self.scratch,
            &mut self.acc,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn convolve_channel(
        fft: &dyn Fft<f32>,
        ifft: &dyn Fft<f32>,
        input: &[f32],
        fdl: &mut [Vec<Complex<f32>>],
        partitions: &[Vec<Complex<f32>>],
        head: usize,
        output: &mut [f32],
        tail: &mut [f32],
        scratch: &mut [Complex<f32>],
        acc: &mut [Complex<f32>],
    ) {
        let count = partitions.len();

        // Transform the completed input block (zero-padded to FFT_SIZE)
        for (i, slot) in scratch.iter_mut().enumerate() {
            let value = input.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(value, 0.0);
        }
        fft.process(scratch);
        fdl[head].copy_from_slice(scratch);

        // Multiply-accumulate across all partitions
        acc.fill(Complex::new(0.0, 0.0));
        for (j, partition) in partitions.iter().enumerate() {
            let spectrum = &fdl[(head + j) % count];
            for (a, (x, h)) in acc.iter_mut().zip(spectrum.iter().zip(partition.iter())) {
                *a += x * h;
            }
        }

        ifft.process(acc);

        // Overlap-add: first half plus the saved tail, second half becomes
        // the next tail
        let scale = 1.0 / FFT_SIZE as f32;
        for i in 0..BLOCK_SIZE {
            output[i] = acc[i].re * scale + tail[i];
        }
        for i in 0..BLOCK_SIZE {
            tail[i] = acc[BLOCK_SIZE + i].re * scale;
        }
    }
}

impl Stage for ConvolutionReverb {
    #[inline]
    fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let out = (self.output_l[self.pos], self.output_r[self.pos]);
        self.input_l[self.pos] = left;
        self.input_r[self.pos] = right;
        self.pos += 1;

        if self.pos == BLOCK_SIZE {
            self.run_block();
            self.pos = 0;
        }

        out
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {
        // The response carries the sample rate; regenerating it at a new
        // rate is the owner's job (via set_impulse_response).
    }

    fn reset(&mut self) {
        self.clear_buffers();
    }

    fn latency_samples(&self) -> usize {
        BLOCK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_ir(gain: f32) -> ImpulseResponse {
        ImpulseResponse {
            left: vec![gain],
            right: vec![gain],
            sample_rate: 44100.0,
        }
    }

    #[test]
    fn test_generate_deterministic() {
        let a = ImpulseResponse::generate(70.0, 1.5, 44100.0);
        let b = ImpulseResponse::generate(70.0, 1.5, 44100.0);
        assert_eq!(a.left(), b.left());
        assert_eq!(a.right(), b.right());
    }

    #[test]
    fn test_generate_length_and_channels_differ() {
        let ir = ImpulseResponse::generate(50.0, 2.0, 44100.0);
        assert_eq!(ir.len(), 88200);
        assert_ne!(ir.left(), ir.right(), "channels should be decorrelated");
    }

    #[test]
    fn test_generate_unit_energy() {
        for decay in [0.5, 2.0, 8.0] {
            let ir = ImpulseResponse::generate(30.0, decay, 44100.0);
            let energy: f64 = ir
                .left()
                .iter()
                .map(|&x| f64::from(x) * f64::from(x))
                .sum();
            assert!(
                (energy - 1.0).abs() < 1e-3,
                "decay {}: energy {}",
                decay,
                energy
            );
        }
    }

    #[test]
    fn test_generate_envelope_decays() {
        let ir = ImpulseResponse::generate(0.0, 2.0, 44100.0);
        let n = ir.len();
        let head: f32 = ir.left()[..n / 8].iter().map(|x| x.abs()).sum();
        let tail: f32 = ir.left()[n - n / 8..].iter().map(|x| x.abs()).sum();
        assert!(
            tail < head * 0.1,
            "tail should be much quieter: head={} tail={}",
            head,
            tail
        );
    }

    #[test]
    fn test_larger_room_is_darker() {
        // Sample-to-sample differences measure high-frequency content
        let bright = ImpulseResponse::generate(0.0, 1.0, 44100.0);
        let dark = ImpulseResponse::generate(100.0, 1.0, 44100.0);

        let roughness = |samples: &[f32]| -> f32 {
            samples.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
        };

        assert!(
            roughness(dark.left()) < roughness(bright.left()),
            "room 100 should have less HF than room 0"
        );
    }

    #[test]
    fn test_convolver_identity_response() {
        let ir = identity_ir(1.0);
        let mut reverb = ConvolutionReverb::new(&ir);

        // Impulse in; expect it back after exactly one block of latency
        let (l, _) = reverb.process(1.0, 1.0);
        assert_eq!(l, 0.0);

        let mut outputs = Vec::new();
        for _ in 0..2 * BLOCK_SIZE {
            let (l, _) = reverb.process(0.0, 0.0);
            outputs.push(l);
        }

        let latency = reverb.latency_samples();
        assert!(
            (outputs[latency - 1] - 1.0).abs() < 1e-3,
            "impulse should appear {} samples late, got {:?}",
            latency,
            &outputs[latency - 3..latency + 2]
        );
        for (i, &x) in outputs.iter().enumerate() {
            if i != latency - 1 {
                assert!(x.abs() < 1e-3, "spurious output {} at {}", x, i);
            }
        }
    }

    #[test]
    fn test_convolver_scales_with_response_gain() {
        let ir = identity_ir(0.5);
        let mut reverb = ConvolutionReverb::new(&ir);

        reverb.process(1.0, 1.0);
        let mut peak = 0.0_f32;
        for _ in 0..2 * BLOCK_SIZE {
            let (l, _) = reverb.process(0.0, 0.0);
            peak = peak.max(l.abs());
        }
        assert!((peak - 0.5).abs() < 1e-3, "expected peak ~0.5, got {}", peak);
    }

    #[test]
    fn test_convolver_multi_partition_tail() {
        // A response longer than one block exercises the partition ring
        let len = 3 * BLOCK_SIZE / 2;
        let ir = ImpulseResponse {
            left: (0..len).map(|i| if i == len - 1 { 1.0 } else { 0.0 }).collect(),
            right: vec![0.0; len],
            sample_rate: 44100.0,
        };
        let mut reverb = ConvolutionReverb::new(&ir);
        assert_eq!(reverb.partition_count(), 2);

        reverb.process(1.0, 0.0);
        let mut found_at = None;
        for i in 1..5 * BLOCK_SIZE {
            let (l, _) = reverb.process(0.0, 0.0);
            if l.abs() > 0.5 {
                found_at = Some(i);
                break;
            }
        }

        // Impulse at response index len-1 plus one block of latency
        let expected = len - 1 + BLOCK_SIZE;
        assert_eq!(found_at, Some(expected));
    }

    #[test]
    fn test_convolver_finite_with_generated_ir() {
        let ir = ImpulseResponse::generate(60.0, 0.3, 44100.0);
        let mut reverb = ConvolutionReverb::new(&ir);

        for i in 0..4 * BLOCK_SIZE {
            let x = libm::sinf(i as f32 * 0.05);
            let (l, r) = reverb.process(x, x);
            assert!(l.is_finite() && r.is_finite());
        }
    }

    #[test]
    fn test_reset_silences_tail() {
        let ir = ImpulseResponse::generate(50.0, 0.5, 44100.0);
        let mut reverb = ConvolutionReverb::new(&ir);

        for _ in 0..2 * BLOCK_SIZE {
            reverb.process(1.0, 1.0);
        }
        reverb.reset();

        for _ in 0..2 * BLOCK_SIZE {
            let (l, r) = reverb.process(0.0, 0.0);
            assert_eq!(l, 0.0);
            assert_eq!(r, 0.0);
        }
    }
}
