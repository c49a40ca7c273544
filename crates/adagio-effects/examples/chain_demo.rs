//! Demonstration of the playback effect chain.
//!
//! Builds every stage the engine wires together — EQ, low-pass, compressor,
//! panner, width, wet/dry bus, output level — and runs a test signal through
//! them with dynamic dispatch.
//!
//! Run with: cargo run -p adagio-effects --example chain_demo

use adagio_core::Stage;
use adagio_effects::{
    Compressor, ConvolutionReverb, ImpulseResponse, LowPassFilter, OutputLevel, StereoPanner,
    StereoWidth, ThreeBandEq, WetDryBus,
};

const SAMPLE_RATE: f32 = 44100.0;

fn stereo_sine(frames: usize) -> (Vec<f32>, Vec<f32>) {
    let tone = |hz: f32| -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE;
                (2.0 * std::f32::consts::PI * hz * t).sin() * 0.5
            })
            .collect()
    };
    (tone(440.0), tone(660.0))
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|x| x * x).sum::<f32>() / samples.len() as f32).sqrt()
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|x| x.abs()).fold(0.0_f32, f32::max)
}

fn main() {
    println!("Adagio Effect Chain Demo");
    println!("========================\n");

    // One second of a 440/660 Hz stereo pair
    let (mut left, mut right) = stereo_sine(44100);
    println!(
        "Input:  RMS {:.4} / {:.4}, peak {:.4}",
        rms(&left),
        rms(&right),
        peak(&left)
    );

    // The engine's chain order: EQ -> low-pass -> compressor -> panner ->
    // width -> wet/dry bus -> output level.
    let mut eq = ThreeBandEq::new(SAMPLE_RATE);
    eq.set_bass_db(4.0);
    eq.set_mid_db(-1.0);
    eq.set_treble_db(-2.0);

    let mut lowpass = LowPassFilter::new(SAMPLE_RATE);
    lowpass.set_cutoff_hz(8000.0);

    let mut compressor = Compressor::new(SAMPLE_RATE);
    compressor.set_threshold_db(-18.0);
    compressor.set_ratio(8.0);

    let mut panner = StereoPanner::new(SAMPLE_RATE);
    panner.set_pan(-0.3);

    let mut width = StereoWidth::new(SAMPLE_RATE);
    width.set_width(1.4);

    let ir = ImpulseResponse::generate(70.0, 1.5, SAMPLE_RATE);
    let mut bus = WetDryBus::new(SAMPLE_RATE, &ir);
    bus.set_reverb_mix(0.25);
    bus.set_echo(0.3, 0.3, 0.2);

    let mut level = OutputLevel::new(SAMPLE_RATE);
    level.set_volume(0.9);

    let chain: [&mut dyn Stage; 7] = [
        &mut eq,
        &mut lowpass,
        &mut compressor,
        &mut panner,
        &mut width,
        &mut bus,
        &mut level,
    ];

    for stage in chain {
        stage.process_block(&mut left, &mut right);
    }

    println!(
        "Output: RMS {:.4} / {:.4}, peak {:.4}",
        rms(&left),
        rms(&right),
        peak(&left)
    );
    println!(
        "Compressor gain reduction at end of block: {:.1} dB",
        compressor.gain_reduction_db()
    );

    // --- Convolver detail ---
    println!("\n=== Convolution Reverb ===\n");

    let reverb = ConvolutionReverb::new(&ir);
    println!(
        "Impulse response: room 70, decay 1.5 s -> {} taps ({:.2} s)",
        ir.len(),
        ir.len() as f32 / SAMPLE_RATE
    );
    println!("Partitions: {}", reverb.partition_count());
    println!("Latency: {} samples", reverb.latency_samples());

    // --- Stage roster ---
    println!("\n=== Stages ===\n");

    let stages_info = [
        ("ThreeBandEq", "Shelving bass/treble, peaking mid"),
        ("LowPassFilter", "Biquad low-pass with Nyquist guard"),
        ("Compressor", "Soft-knee dynamics, linked stereo detector"),
        ("StereoPanner", "Equal-power pan, channel fold-in"),
        ("StereoWidth", "Mid/side width scaling"),
        ("Echo", "Feedback delay on the send bus"),
        ("ConvolutionReverb", "Partitioned FFT convolution"),
        ("WetDryBus", "Dry path + reverb and echo sends"),
        ("OutputLevel", "Smoothed volume times fade ramp"),
    ];

    for (name, desc) in stages_info {
        println!("  {:<18} - {}", name, desc);
    }

    println!("\nChain demo complete.");
}
