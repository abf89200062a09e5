//! Grain-echo processing command: record a WAV into the loop, let the
//! stochastic envelope deform it over several passes, and write the result.

use std::path::PathBuf;

use clap::Args;
use grandy_core::{GrainEcho, GrainEchoParams, LOOP_FADE_LEN, MAX_SAMPLE_LEN};

use crate::commands::common::{
    CliBoundary, CliDistribution, CliShape, peak, render_progress, scale_and_limit,
};
use crate::wav::{read_mono, write_mono};

#[derive(Args)]
pub struct EchoArgs {
    /// Input WAV file (mixed down to mono)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Number of passes over the loop to render
    #[arg(long, default_value = "8")]
    passes: usize,

    /// Loop length in samples (clamped to the input length and the
    /// engine's one-second capacity)
    #[arg(long, default_value = "44100")]
    loop_len: usize,

    /// Samples between breakpoints
    #[arg(long, default_value = "1500")]
    spacing: usize,

    /// Max amplitude step per breakpoint cycle
    #[arg(long, default_value = "0.05")]
    amp_step: f32,

    /// Max duration step per breakpoint cycle
    #[arg(long, default_value = "0.05")]
    dur_step: f32,

    /// Accumulate amplitude walks across cycles instead of restarting
    /// from zero
    #[arg(long)]
    accumulate: bool,

    /// Grain window shape
    #[arg(long, value_enum, default_value = "triangle")]
    envelope: CliShape,

    /// Boundary policy for the breakpoint walks
    #[arg(long, value_enum, default_value = "clamp")]
    boundary: CliBoundary,

    /// Step distribution for the breakpoint walks
    #[arg(long, value_enum, default_value = "linear")]
    distribution: CliDistribution,

    /// Random walk seed
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Output amplitude (0-1)
    #[arg(long, default_value = "0.8")]
    amplitude: f32,
}

pub fn run(args: EchoArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (input, sample_rate) = read_mono(&args.input)?;

    let loop_len = args.loop_len.min(input.len()).min(MAX_SAMPLE_LEN);
    if loop_len <= LOOP_FADE_LEN {
        anyhow::bail!(
            "loop length {loop_len} too short (need more than {LOOP_FADE_LEN} samples)"
        );
    }
    if args.spacing < 2 || args.spacing >= loop_len {
        anyhow::bail!("--spacing must be in 2..{loop_len}");
    }

    let params = GrainEchoParams {
        sample_length: loop_len,
        point_spacing: args.spacing,
        max_amp_step: args.amp_step,
        max_dur_step: args.dur_step,
        accumulate: args.accumulate,
        boundary: args.boundary.into(),
        distribution: args.distribution.into(),
        envelope: args.envelope.into(),
        mod_bounds: 1.0,
    };

    println!(
        "  {} input samples at {} Hz; loop {} samples, {} breakpoints",
        input.len(),
        sample_rate,
        loop_len,
        loop_len / args.spacing + 1
    );

    let mut echo = GrainEcho::new(args.seed);
    echo.begin_record(&params);
    let mut feed = input.iter().copied();
    while echo.is_recording() {
        echo.advance(feed.next().unwrap_or(0.0), &params);
    }

    let total = args.passes * loop_len;
    println!("Mangling {} passes ({} samples)...", args.passes, total);

    let mut samples = Vec::with_capacity(total);
    let pb = render_progress(total as u64);
    for i in 0..total {
        samples.push(echo.advance(0.0, &params));
        if i % 4096 == 0 {
            pb.set_position(i as u64);
        }
    }
    pb.finish_and_clear();

    scale_and_limit(&mut samples, args.amplitude);
    write_mono(&args.output, &samples, sample_rate)?;

    println!(
        "Wrote {} ({} samples, peak {:.3})",
        args.output.display(),
        samples.len(),
        peak(&samples)
    );
    Ok(())
}
