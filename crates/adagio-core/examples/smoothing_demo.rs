//! Parameter smoothing demo: exponential smoothing vs. linear ramps.
//!
//! Run with: cargo run -p adagio-core --example smoothing_demo

use adagio_core::{LinearRamp, SmoothedValue};

fn main() {
    let sample_rate = 48000.0;

    // --- Exponential smoothing ---
    println!("=== SmoothedValue (10 ms time constant) ===\n");

    let mut smoothed = SmoothedValue::new(0.0, sample_rate, 10.0);
    smoothed.set_target(1.0);

    println!("{:>8} {:>10}", "ms", "value");
    println!("{:->8} {:->10}", "", "");

    let mut sample = 0usize;
    for checkpoint_ms in [1.0, 5.0, 10.0, 20.0, 50.0] {
        let until = (checkpoint_ms / 1000.0 * sample_rate) as usize;
        while sample < until {
            smoothed.advance();
            sample += 1;
        }
        println!("{:>8.0} {:>10.4}", checkpoint_ms, smoothed.get());
    }

    println!("\nAfter one time constant (10 ms) the value sits near 63%;");
    println!("after five it is settled for audio purposes.");

    // --- Linear ramp ---
    println!("\n=== LinearRamp (constant rate, exact arrival) ===\n");

    let mut ramp = LinearRamp::new(0.0, sample_rate, 0.050);
    ramp.set_target(1.0);

    println!("{:>8} {:>10} {:>10}", "ms", "value", "settled");
    println!("{:->8} {:->10} {:->10}", "", "", "");

    let mut sample = 0usize;
    for checkpoint_ms in [10.0, 25.0, 40.0, 50.0, 60.0] {
        let until = (checkpoint_ms / 1000.0 * sample_rate) as usize;
        while sample < until {
            ramp.advance();
            sample += 1;
        }
        println!(
            "{:>8.0} {:>10.4} {:>10}",
            checkpoint_ms,
            ramp.get(),
            if ramp.is_settled() { "yes" } else { "no" }
        );
    }

    // --- Complementary crossfade ramps ---
    println!("\n=== Complementary Ramps (crossfade gains) ===\n");

    let mut up = LinearRamp::new(0.0, sample_rate, 0.050);
    let mut down = LinearRamp::new(1.0, sample_rate, 0.050);
    up.set_target(1.0);
    down.set_target(0.0);

    let mut worst = 0.0_f32;
    for _ in 0..(sample_rate * 0.060) as usize {
        let sum = up.advance() + down.advance();
        worst = worst.max((sum - 1.0).abs());
    }

    println!("Two opposite 50 ms ramps over a 60 ms run:");
    println!("  worst |sum - 1| = {:.2e}", worst);
    println!("  (constant total gain is what makes a crossfade click-free)");

    println!("\nSmoothing demo complete.");
}
