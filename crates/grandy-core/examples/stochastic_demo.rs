//! Stochastic synthesis demo: breakpoint oscillator and stitcher.
//!
//! Run with: cargo run -p grandy-core --example stochastic_demo

use grandy_core::{
    BoundaryMode, GendyOscillator, GendyParams, StepDistribution, Stitcher, StitcherParams,
};

fn main() {
    // --- Single oscillator, both boundary policies ---
    println!("=== GendyOscillator (first 12 samples per policy) ===\n");

    for (name, boundary) in [("Clamp", BoundaryMode::Clamp), ("Mirror", BoundaryMode::Mirror)] {
        let mut osc = GendyOscillator::new(0xC0FFEE);
        let params = GendyParams {
            max_amp_step: 0.2,
            max_dur_step: 0.1,
            boundary,
            distribution: StepDistribution::Cauchy,
            ..GendyParams::default()
        };

        let samples: Vec<f32> = (0..12).map(|_| osc.advance(&params)).collect();
        print!("{:<8}", name);
        for s in &samples {
            print!(" {:>7.4}", s);
        }
        println!();
    }

    // --- Stitcher hand-offs ---
    println!("\n=== Stitcher (hand-off schedule over 1s at 48kHz) ===\n");

    let mut stitcher = Stitcher::new(7);
    let params = StitcherParams {
        stutters: [1, 2, 3, 1],
        ..StitcherParams::default()
    };

    let mut prev_voice = stitcher.current();
    for tick in 0..48_000 {
        stitcher.advance(&params);
        if stitcher.current() != prev_voice {
            println!(
                "tick {:>6}: voice {} -> {} (crossfading: {})",
                tick,
                prev_voice,
                stitcher.current(),
                stitcher.is_fading()
            );
            prev_voice = stitcher.current();
        }
    }
}
