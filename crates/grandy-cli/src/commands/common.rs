//! Shared CLI helpers: enum bridging, list parsing, progress reporting.

use clap::ValueEnum;
use grandy_core::{BoundaryMode, EnvShape, StepDistribution};
use indicatif::{ProgressBar, ProgressStyle};

/// Envelope shapes for CLI flags.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliShape {
    #[default]
    Sine,
    Triangle,
    Hann,
    Welch,
    Tukey,
}

impl From<CliShape> for EnvShape {
    fn from(s: CliShape) -> Self {
        match s {
            CliShape::Sine => EnvShape::Sine,
            CliShape::Triangle => EnvShape::Triangle,
            CliShape::Hann => EnvShape::Hann,
            CliShape::Welch => EnvShape::Welch,
            CliShape::Tukey => EnvShape::Tukey,
        }
    }
}

/// Boundary policies for CLI flags.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliBoundary {
    #[default]
    Clamp,
    Mirror,
}

impl From<CliBoundary> for BoundaryMode {
    fn from(b: CliBoundary) -> Self {
        match b {
            CliBoundary::Clamp => BoundaryMode::Clamp,
            CliBoundary::Mirror => BoundaryMode::Mirror,
        }
    }
}

/// Step distributions for CLI flags.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliDistribution {
    #[default]
    Linear,
    Cauchy,
    Arcsine,
}

impl From<CliDistribution> for StepDistribution {
    fn from(d: CliDistribution) -> Self {
        match d {
            CliDistribution::Linear => StepDistribution::Linear,
            CliDistribution::Cauchy => StepDistribution::Cauchy,
            CliDistribution::Arcsine => StepDistribution::Arcsine,
        }
    }
}

/// Parse a comma-separated list into exactly `N` values, repeating the last
/// entry to fill missing slots.
pub fn parse_list<T, const N: usize>(s: &str, what: &str) -> anyhow::Result<[T; N]>
where
    T: Copy + core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let mut parsed = Vec::new();
    for part in s.split(',') {
        let v = part
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {what} entry '{part}': {e}"))?;
        parsed.push(v);
    }
    let last = *parsed
        .last()
        .ok_or_else(|| anyhow::anyhow!("empty {what} list"))?;
    while parsed.len() < N {
        parsed.push(last);
    }
    parsed.truncate(N);
    Ok(core::array::from_fn(|i| parsed[i]))
}

/// Standard render progress bar over a sample count.
pub fn render_progress(total_samples: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_samples);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );
    pb
}

/// Scale samples by `amplitude` and hard-limit to `[-1, 1]`, reporting how
/// many samples hit the limiter.
pub fn scale_and_limit(samples: &mut [f32], amplitude: f32) {
    let mut clipped = 0usize;
    for s in samples.iter_mut() {
        *s *= amplitude;
        if s.abs() > 1.0 {
            *s = s.clamp(-1.0, 1.0);
            clipped += 1;
        }
    }
    if clipped > 0 {
        tracing::warn!(clipped, total = samples.len(), "output hit the limiter");
    }
}

/// Peak level of a sample block.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_pads_with_last_entry() {
        let v: [u32; 4] = parse_list("1,2", "stutter").unwrap();
        assert_eq!(v, [1, 2, 2, 2]);
    }

    #[test]
    fn parse_list_truncates_extras() {
        let v: [f32; 2] = parse_list("0.5, 1.0, 2.0", "freq").unwrap();
        assert_eq!(v, [0.5, 1.0]);
    }

    #[test]
    fn parse_list_rejects_garbage() {
        assert!(parse_list::<u32, 4>("1,x", "stutter").is_err());
    }

    #[test]
    fn limiter_clamps_and_scales() {
        let mut s = [0.5, -2.0, 1.0];
        scale_and_limit(&mut s, 0.8);
        assert!((s[0] - 0.4).abs() < 1e-6);
        assert!((s[1] + 1.0).abs() < 1e-6);
        assert!((s[2] - 0.8).abs() < 1e-6);
    }
}
