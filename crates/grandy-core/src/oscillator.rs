//! Breakpoint oscillator performing granular dynamic stochastic synthesis.
//!
//! The oscillator keeps a small set of breakpoints (amplitude, duration,
//! grain offset) and interpolates linearly between them while a phase
//! accumulator sweeps each segment. Every time the phase wraps, the
//! breakpoint under the cursor is re-drawn by a bounded random walk, so the
//! waveform continuously deforms without ever jumping discontinuously.
//! An optional granular overlay adds a short windowed fragment of a grain
//! source on top of the interpolated amplitude.

use libm::floorf;

use crate::walk::{BoundaryMode, RandomWalk, StepDistribution};
use crate::wavetable::{EnvShape, Wavetable};

/// Breakpoint storage capacity per oscillator.
pub const MAX_BREAKPOINTS: usize = 50;

/// Wrap a phase accumulator into `[0, 1)`.
#[inline]
fn wrap01(x: f32) -> f32 {
    x - floorf(x)
}

/// Per-tick control input for a [`GendyOscillator`].
///
/// All values are expected pre-clamped by the host-facing layer; the engine
/// debug-asserts the preconditions and performs no validation in release
/// builds.
#[derive(Clone, Copy, Debug)]
pub struct GendyParams {
    /// Seconds per tick (1 / sample rate).
    pub delta_time: f32,
    /// Active breakpoint count, `2..=MAX_BREAKPOINTS`.
    pub num_points: usize,
    /// Lower bound of the walked frequency range in Hz.
    pub min_freq: f32,
    /// Upper bound of the walked frequency range in Hz.
    pub max_freq: f32,
    /// External frequency multiplier.
    pub freq_mul: f32,
    /// Largest amplitude mutation per breakpoint cycle.
    pub max_amp_step: f32,
    /// Largest duration mutation per breakpoint cycle.
    pub max_dur_step: f32,
    /// Read-rate multiplier for the grain-source heads.
    pub grain_rate: f32,
    /// Enable the granular overlay.
    pub grain_on: bool,
    /// Boundary policy for the breakpoint walks.
    pub boundary: BoundaryMode,
    /// Distribution transform for the breakpoint walks.
    pub distribution: StepDistribution,
    /// Grain window shape.
    pub envelope: EnvShape,
}

impl Default for GendyParams {
    fn default() -> Self {
        Self {
            delta_time: 1.0 / 48_000.0,
            num_points: 12,
            min_freq: 30.0,
            max_freq: 1000.0,
            freq_mul: 1.0,
            max_amp_step: 0.05,
            max_dur_step: 0.05,
            grain_rate: 1.0,
            grain_on: true,
            boundary: BoundaryMode::Clamp,
            distribution: StepDistribution::Linear,
            envelope: EnvShape::Sine,
        }
    }
}

/// Stochastic breakpoint oscillator with granular overlay.
///
/// Advance it one tick at a time with [`GendyOscillator::advance`]; each
/// call consumes the current control parameters and produces one output
/// sample. [`GendyOscillator::cycle_complete`] is true for exactly one tick
/// per full pass over all breakpoints, which is what the stitcher uses to
/// schedule hand-offs.
///
/// # Example
///
/// ```rust
/// use grandy_core::{GendyOscillator, GendyParams};
///
/// let mut osc = GendyOscillator::new(1);
/// let params = GendyParams::default();
///
/// let sample = osc.advance(&params);
/// assert!(sample.is_finite());
/// ```
#[derive(Clone, Debug)]
pub struct GendyOscillator {
    /// Breakpoint amplitudes in [-1, 1].
    amps: [f32; MAX_BREAKPOINTS],
    /// Breakpoint duration multipliers in [0.5, 1.5].
    durs: [f32; MAX_BREAKPOINTS],
    /// Breakpoint grain start phases in [0, 1). Persisted, never walked.
    offs: [f32; MAX_BREAKPOINTS],
    /// Current breakpoint cursor.
    index: usize,
    /// Segment phase. Starts at 1.0 so the first tick draws a breakpoint.
    phase: f32,
    /// Interpolation endpoints.
    amp: f32,
    amp_next: f32,
    /// Phase increment per tick, recomputed at each wrap.
    speed: f32,
    /// Grain-source read heads for the two endpoints.
    off: f32,
    off_next: f32,
    /// Grain-window phases for the two endpoints.
    g_idx: f32,
    g_idx_next: f32,
    /// True for the single tick on which the cursor reached its final slot.
    last_flag: bool,
    /// Grain window table.
    env: Wavetable,
    /// Grain source table.
    grain: Wavetable,
    /// Breakpoint mutation stream.
    walk: RandomWalk,
}

impl GendyOscillator {
    /// Create an oscillator with its walk seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            amps: [0.0; MAX_BREAKPOINTS],
            durs: [1.0; MAX_BREAKPOINTS],
            offs: [0.0; MAX_BREAKPOINTS],
            index: 0,
            phase: 1.0,
            amp: 0.0,
            amp_next: 0.0,
            speed: 0.0,
            off: 0.0,
            off_next: 0.0,
            g_idx: 0.0,
            g_idx_next: 0.5,
            last_flag: false,
            env: Wavetable::new(EnvShape::Sine),
            grain: Wavetable::new(EnvShape::Sine),
            walk: RandomWalk::new(seed),
        }
    }

    /// True for exactly one tick per full cycle through all breakpoints.
    #[inline]
    pub fn cycle_complete(&self) -> bool {
        self.last_flag
    }

    /// Phase increment per tick, as computed at the most recent wrap.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current segment phase in `[0, 1)` (1.0 before the first tick).
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current breakpoint cursor.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Seed per-breakpoint grain start phases.
    ///
    /// Offsets persist across mutation cycles; only amplitude and duration
    /// are walked. Values must lie in `[0, 1)`.
    pub fn set_offsets(&mut self, offsets: &[f32]) {
        for (slot, &v) in self.offs.iter_mut().zip(offsets) {
            debug_assert!((0.0..1.0).contains(&v), "grain offset out of range: {v}");
            *slot = v;
        }
    }

    /// Advance one tick and produce one output sample.
    pub fn advance(&mut self, p: &GendyParams) -> f32 {
        debug_assert!(
            (2..=MAX_BREAKPOINTS).contains(&p.num_points),
            "breakpoint count out of range: {}",
            p.num_points
        );
        debug_assert!(p.min_freq <= p.max_freq);

        self.last_flag = false;
        self.env.set_shape(p.envelope);

        if self.phase >= 1.0 {
            // Carry the remainder forward rather than resetting, so
            // sub-sample timing survives the wrap.
            self.phase -= 1.0;

            self.amp = self.amp_next;
            self.index = (self.index + 1) % p.num_points;
            self.last_flag = self.index == p.num_points - 1;

            self.amps[self.index] = self.walk.step(
                self.amps[self.index],
                p.max_amp_step,
                p.distribution,
                p.boundary,
                -1.0,
                1.0,
            );
            self.durs[self.index] = self.walk.step(
                self.durs[self.index],
                p.max_dur_step,
                p.distribution,
                p.boundary,
                0.5,
                1.5,
            );

            self.amp_next = self.amps[self.index];
            let rate = self.durs[self.index];

            self.off = self.off_next;
            self.off_next = self.offs[self.index];

            self.g_idx = self.g_idx_next;
            self.g_idx_next = 0.0;

            // Instantaneous frequency tracks the walked duration value,
            // interpolated between the configured frequency bounds.
            self.speed = ((p.max_freq - p.min_freq) * rate + p.min_freq)
                * p.delta_time
                * p.num_points as f32
                * p.freq_mul;
        }

        let out = if p.grain_on {
            let g_amp = self.amp + self.env.get(self.g_idx) * self.grain.get(self.off);
            let g_amp_next =
                self.amp_next + self.env.get(self.g_idx_next) * self.grain.get(self.off_next);
            (1.0 - self.phase) * g_amp + self.phase * g_amp_next
        } else {
            (1.0 - self.phase) * self.amp + self.phase * self.amp_next
        };

        // Grain windows sweep at half the segment rate.
        self.g_idx = wrap01(self.g_idx + 0.5 * self.speed);
        self.g_idx_next = wrap01(self.g_idx_next + 0.5 * self.speed);

        // The two source read heads creep at deliberately mismatched rates.
        self.off = wrap01(self.off + p.grain_rate * 1e-1 * p.delta_time);
        self.off_next = wrap01(self.off_next + p.grain_rate * 1e-4 * p.delta_time);

        self.phase += self.speed;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_params() -> GendyParams {
        GendyParams {
            num_points: 4,
            max_amp_step: 0.0,
            max_dur_step: 0.0,
            grain_on: false,
            ..GendyParams::default()
        }
    }

    #[test]
    fn zero_variance_walk_is_silent() {
        let mut osc = GendyOscillator::new(9);
        let p = quiet_params();
        for _ in 0..10_000 {
            let out = osc.advance(&p);
            assert!(out.abs() < 1e-6, "expected silence, got {out}");
        }
    }

    #[test]
    fn cycle_complete_fires_once_per_pass() {
        let mut osc = GendyOscillator::new(5);
        let p = GendyParams {
            num_points: 4,
            ..GendyParams::default()
        };

        let mut wraps = 0u32;
        let mut completions = 0u32;
        let mut prev_index = osc.index();
        for _ in 0..200_000 {
            osc.advance(&p);
            if osc.index() != prev_index {
                wraps += 1;
                prev_index = osc.index();
            }
            if osc.cycle_complete() {
                completions += 1;
            }
        }

        assert!(completions > 0, "oscillator never completed a cycle");
        // One completion per num_points wraps, give or take the partial
        // cycle in flight at either end.
        let expected = wraps / 4;
        assert!(
            completions.abs_diff(expected) <= 1,
            "wraps={wraps} completions={completions}"
        );
    }

    #[test]
    fn phase_progresses_and_wraps_by_one() {
        let mut osc = GendyOscillator::new(2);
        let p = quiet_params();
        osc.advance(&p);

        let mut prev = osc.phase();
        for _ in 0..50_000 {
            osc.advance(&p);
            let cur = osc.phase();
            let delta = cur - prev;
            // Either a forward step of `speed`, or a wrap that subtracted
            // exactly 1.0 before stepping.
            let stepped = (delta - osc.speed()).abs() < 1e-5;
            let wrapped = (delta - (osc.speed() - 1.0)).abs() < 1e-5;
            assert!(stepped || wrapped, "phase moved by {delta}");
            prev = cur;
        }
    }

    #[test]
    fn speed_is_positive_for_valid_params() {
        let mut osc = GendyOscillator::new(13);
        let p = GendyParams::default();
        for _ in 0..10_000 {
            osc.advance(&p);
            assert!(osc.speed() > 0.0);
        }
    }

    #[test]
    fn grain_overlay_stays_bounded() {
        let mut osc = GendyOscillator::new(21);
        let p = GendyParams {
            max_amp_step: 0.3,
            max_dur_step: 0.3,
            boundary: BoundaryMode::Mirror,
            envelope: EnvShape::Hann,
            ..GendyParams::default()
        };
        for _ in 0..50_000 {
            let out = osc.advance(&p);
            // Breakpoint amplitude is in [-1, 1]; the grain adds at most
            // |env| * |grain| <= 1 on each endpoint.
            assert!(out.abs() <= 2.0 + 1e-4, "overlay escaped: {out}");
        }
    }

    #[test]
    fn same_seed_renders_identically() {
        let p = GendyParams::default();
        let mut a = GendyOscillator::new(77);
        let mut b = GendyOscillator::new(77);
        for _ in 0..5_000 {
            assert_eq!(a.advance(&p).to_bits(), b.advance(&p).to_bits());
        }
    }
}
