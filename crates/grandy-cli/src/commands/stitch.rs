//! Stitched multi-oscillator render command.

use std::path::PathBuf;

use clap::Args;
use grandy_core::{
    GendyParams, MAX_BREAKPOINTS, MAX_OSCILLATORS, Stitcher, StitcherParams,
};

use crate::commands::common::{
    CliBoundary, CliDistribution, CliShape, parse_list, peak, render_progress, scale_and_limit,
};
use crate::wav::write_mono;

#[derive(Args)]
pub struct StitchArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "8.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Random walk seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of active oscillators (1-4)
    #[arg(long, default_value = "4")]
    oscillators: usize,

    /// Per-oscillator stutter counts, comma-separated (short lists repeat
    /// their last entry)
    #[arg(long, default_value = "1")]
    stutters: String,

    /// Per-oscillator frequency multipliers, comma-separated
    #[arg(long, default_value = "1.0")]
    freq_muls: String,

    /// Number of breakpoints per oscillator (2-50)
    #[arg(long, default_value = "12")]
    points: usize,

    /// Lower frequency bound in Hz
    #[arg(long, default_value = "30.0")]
    min_freq: f32,

    /// Upper frequency bound in Hz
    #[arg(long, default_value = "1000.0")]
    max_freq: f32,

    /// Max amplitude step per breakpoint cycle
    #[arg(long, default_value = "0.05")]
    amp_step: f32,

    /// Max duration step per breakpoint cycle
    #[arg(long, default_value = "0.05")]
    dur_step: f32,

    /// Grain read-rate multiplier
    #[arg(long, default_value = "1.0")]
    grain_rate: f32,

    /// Disable the granular overlay
    #[arg(long)]
    no_grain: bool,

    /// Grain window shape
    #[arg(long, value_enum, default_value = "sine")]
    envelope: CliShape,

    /// Boundary policy for the breakpoint walks
    #[arg(long, value_enum, default_value = "clamp")]
    boundary: CliBoundary,

    /// Step distribution for the breakpoint walks
    #[arg(long, value_enum, default_value = "linear")]
    distribution: CliDistribution,

    /// Output amplitude (0-1)
    #[arg(long, default_value = "0.5")]
    amplitude: f32,
}

pub fn run(args: StitchArgs) -> anyhow::Result<()> {
    if !(1..=MAX_OSCILLATORS).contains(&args.oscillators) {
        anyhow::bail!("--oscillators must be in 1..={MAX_OSCILLATORS}");
    }
    if !(2..=MAX_BREAKPOINTS).contains(&args.points) {
        anyhow::bail!("--points must be in 2..={MAX_BREAKPOINTS}");
    }

    let stutters: [u32; MAX_OSCILLATORS] = parse_list(&args.stutters, "stutter")?;
    let freq_muls: [f32; MAX_OSCILLATORS] = parse_list(&args.freq_muls, "freq-mul")?;

    let base = GendyParams {
        delta_time: 1.0 / args.sample_rate as f32,
        num_points: args.points,
        min_freq: args.min_freq,
        max_freq: args.max_freq,
        freq_mul: 1.0,
        max_amp_step: args.amp_step,
        max_dur_step: args.dur_step,
        grain_rate: args.grain_rate,
        grain_on: !args.no_grain,
        boundary: args.boundary.into(),
        distribution: args.distribution.into(),
        envelope: args.envelope.into(),
    };
    let params = StitcherParams {
        num_oscs: args.oscillators,
        stutters,
        oscs: core::array::from_fn(|i| GendyParams {
            freq_mul: freq_muls[i],
            ..base
        }),
    };

    let total = (args.duration * args.sample_rate as f32) as usize;
    println!(
        "Stitching {} voices for {:.2}s at {} Hz (stutters {:?})...",
        args.oscillators, args.duration, args.sample_rate, stutters
    );

    let mut stitcher = Stitcher::new(args.seed);
    let mut samples = Vec::with_capacity(total);
    let mut hand_offs = 0u32;
    let mut was_fading = false;

    let pb = render_progress(total as u64);
    for i in 0..total {
        samples.push(stitcher.advance(&params));
        if stitcher.is_fading() && !was_fading {
            hand_offs += 1;
        }
        was_fading = stitcher.is_fading();
        if i % 4096 == 0 {
            pb.set_position(i as u64);
        }
    }
    pb.finish_and_clear();

    scale_and_limit(&mut samples, args.amplitude);
    write_mono(&args.output, &samples, args.sample_rate)?;

    println!(
        "Wrote {} ({} samples, {} hand-offs, peak {:.3})",
        args.output.display(),
        samples.len(),
        hand_offs,
        peak(&samples)
    );
    Ok(())
}
