//! Bounded random-walk stepping for breakpoint mutation.
//!
//! Each breakpoint mutation draws a normally-distributed value, scales it
//! by the configured step limit, optionally reshapes it through a selectable
//! distribution transform, and keeps the result inside a closed interval via
//! a boundary policy. Policy and distribution are passed in on every step,
//! so switching either mid-walk takes effect on the next mutation.

use core::f32::consts::{FRAC_PI_2, PI};
use libm::{cosf, logf, sinf, sqrtf, tanf};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Policy for keeping a walking value inside `[lo, hi]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryMode {
    /// Pin an overshooting value exactly at the violated bound.
    #[default]
    Clamp,
    /// Reflect the overshoot back into range, preserving walk energy.
    Mirror,
}

/// Transform applied to the raw normal draw before it is added to the
/// walking value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StepDistribution {
    /// Identity — the normal draw is used as-is.
    #[default]
    Linear,
    /// Heavy-tailed reshape: `tan` of the draw, clamped short of the poles.
    Cauchy,
    /// Extreme-biased reshape: `sin` of the clamped draw, favouring steps
    /// near the full step limit.
    Arcsine,
}

/// Reflect `x` into `[lo, hi]` by folding the overshoot back into range.
///
/// A value that overshoots a bound by `d` lands at `bound - d`. Folding is
/// done with modular arithmetic, so arbitrarily large overshoots still
/// resolve in constant time.
#[inline]
pub fn reflect(x: f32, lo: f32, hi: f32) -> f32 {
    debug_assert!(hi > lo, "degenerate interval [{lo}, {hi}]");
    let range = hi - lo;
    let period = 2.0 * range;
    let mut t = (x - lo) % period;
    if t < 0.0 {
        t += period;
    }
    if t > range {
        t = period - t;
    }
    lo + t
}

/// Seeded generator of bounded stochastic steps.
///
/// Owns a deterministic PCG stream, so two walks constructed from the same
/// seed produce identical step sequences — the property the regression
/// tests and offline renders rely on.
#[derive(Clone, Debug)]
pub struct RandomWalk {
    rng: Pcg32,
}

impl RandomWalk {
    /// Create a walk seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Draw a standard-normal value via the Box-Muller transform.
    #[inline]
    pub fn normal(&mut self) -> f32 {
        // 1 - gen() keeps u1 in (0, 1] so the log stays finite.
        let u1: f32 = 1.0 - self.rng.r#gen::<f32>();
        let u2: f32 = self.rng.r#gen();
        sqrtf(-2.0 * logf(u1)) * cosf(2.0 * PI * u2)
    }

    /// Advance `current` by one bounded stochastic step.
    ///
    /// The step magnitude is `max_step` times the reshaped normal draw; the
    /// sum is then adjusted into `[lo, hi]` by the boundary policy.
    #[inline]
    pub fn step(
        &mut self,
        current: f32,
        max_step: f32,
        dist: StepDistribution,
        mode: BoundaryMode,
        lo: f32,
        hi: f32,
    ) -> f32 {
        let raw = current + max_step * shape(dist, self.normal());
        match mode {
            BoundaryMode::Clamp => raw.clamp(lo, hi),
            BoundaryMode::Mirror => reflect(raw, lo, hi),
        }
    }
}

/// Apply the distribution transform to a normal draw.
#[inline]
fn shape(dist: StepDistribution, u: f32) -> f32 {
    match dist {
        StepDistribution::Linear => u,
        // Clamped to ±1.45 rad to keep tan finite; tails still reach ~8x.
        StepDistribution::Cauchy => tanf(u.clamp(-1.45, 1.45)),
        StepDistribution::Arcsine => sinf(FRAC_PI_2 * u.clamp(-1.0, 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_returns_overshoot_into_range() {
        // Overshoot above by 0.3 lands 0.3 below the bound.
        assert!((reflect(1.3, -1.0, 1.0) - 0.7).abs() < 1e-6);
        // Overshoot below by 0.25.
        assert!((reflect(-1.25, -1.0, 1.0) + 0.75).abs() < 1e-6);
        // In-range values pass through untouched.
        assert!((reflect(0.4, -1.0, 1.0) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn reflect_folds_large_overshoots() {
        // 3.5 over an interval of width 2: fold at 1.0 -> -1.5 over,
        // fold at -1.0 -> 0.5 back in.
        let v = reflect(4.5, -1.0, 1.0);
        assert!((-1.0..=1.0).contains(&v));
        assert!((v + 0.5).abs() < 1e-5, "got {v}");
    }

    #[test]
    fn clamp_pins_at_bound() {
        let mut walk = RandomWalk::new(7);
        for _ in 0..2000 {
            let v = walk.step(
                0.95,
                0.5,
                StepDistribution::Linear,
                BoundaryMode::Clamp,
                -1.0,
                1.0,
            );
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn mirror_keeps_walk_in_range() {
        let mut walk = RandomWalk::new(11);
        let mut v = 0.0;
        for _ in 0..5000 {
            v = walk.step(
                v,
                0.3,
                StepDistribution::Cauchy,
                BoundaryMode::Mirror,
                0.5,
                1.5,
            );
            assert!((0.5..=1.5).contains(&v), "mirror escaped: {v}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomWalk::new(42);
        let mut b = RandomWalk::new(42);
        for _ in 0..64 {
            assert_eq!(a.normal().to_bits(), b.normal().to_bits());
        }
    }

    #[test]
    fn all_distributions_produce_finite_steps() {
        for dist in [
            StepDistribution::Linear,
            StepDistribution::Cauchy,
            StepDistribution::Arcsine,
        ] {
            let mut walk = RandomWalk::new(3);
            for _ in 0..1000 {
                let v = walk.step(0.0, 1.0, dist, BoundaryMode::Mirror, -1.0, 1.0);
                assert!(v.is_finite(), "{:?} produced {}", dist, v);
            }
        }
    }
}
