//! Single-oscillator render command.

use std::path::PathBuf;

use clap::Args;
use grandy_core::{GendyOscillator, GendyParams, MAX_BREAKPOINTS};

use crate::commands::common::{
    CliBoundary, CliDistribution, CliShape, peak, render_progress, scale_and_limit,
};
use crate::wav::write_mono;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(long, default_value = "4.0")]
    duration: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Random walk seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Number of breakpoints (2-50)
    #[arg(long, default_value = "12")]
    points: usize,

    /// Lower frequency bound in Hz
    #[arg(long, default_value = "30.0")]
    min_freq: f32,

    /// Upper frequency bound in Hz
    #[arg(long, default_value = "1000.0")]
    max_freq: f32,

    /// Frequency multiplier
    #[arg(long, default_value = "1.0")]
    freq_mul: f32,

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

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    if !(2..=MAX_BREAKPOINTS).contains(&args.points) {
        anyhow::bail!("--points must be in 2..={MAX_BREAKPOINTS}");
    }
    if args.min_freq > args.max_freq {
        anyhow::bail!("--min-freq must not exceed --max-freq");
    }

    let params = GendyParams {
        delta_time: 1.0 / args.sample_rate as f32,
        num_points: args.points,
        min_freq: args.min_freq,
        max_freq: args.max_freq,
        freq_mul: args.freq_mul,
        max_amp_step: args.amp_step,
        max_dur_step: args.dur_step,
        grain_rate: args.grain_rate,
        grain_on: !args.no_grain,
        boundary: args.boundary.into(),
        distribution: args.distribution.into(),
        envelope: args.envelope.into(),
    };

    let total = (args.duration * args.sample_rate as f32) as usize;
    println!(
        "Rendering {:.2}s ({} samples) at {} Hz, seed {}...",
        args.duration, total, args.sample_rate, args.seed
    );

    let mut osc = GendyOscillator::new(args.seed);
    let mut samples = Vec::with_capacity(total);

    let pb = render_progress(total as u64);
    for i in 0..total {
        samples.push(osc.advance(&params));
        if i % 4096 == 0 {
            pb.set_position(i as u64);
        }
    }
    pb.finish_and_clear();

    scale_and_limit(&mut samples, args.amplitude);
    write_mono(&args.output, &samples, args.sample_rate)?;

    println!(
        "Wrote {} ({} samples, peak {:.3})",
        args.output.display(),
        samples.len(),
        peak(&samples)
    );
    Ok(())
}
