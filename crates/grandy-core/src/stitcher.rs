//! Sequencing of several breakpoint oscillators with crossfaded hand-offs.
//!
//! The stitcher owns a bank of oscillators and plays exactly one at a time.
//! When the playing oscillator completes a full breakpoint cycle and its
//! stutter countdown is exhausted, the stitcher latches the departing
//! sample and the next oscillator's first sample, then spends one phase
//! cycle crossfading between the two before handing control over. While
//! the crossfade runs, no oscillator advances.

use crate::oscillator::{GendyOscillator, GendyParams};

/// Number of oscillator slots in a stitcher.
pub const MAX_OSCILLATORS: usize = 4;

/// Per-tick control input for a [`Stitcher`].
#[derive(Clone, Copy, Debug)]
pub struct StitcherParams {
    /// Active oscillator count, `1..=MAX_OSCILLATORS`.
    pub num_oscs: usize,
    /// Full breakpoint cycles each oscillator repeats before handing off.
    pub stutters: [u32; MAX_OSCILLATORS],
    /// Per-oscillator control input.
    pub oscs: [GendyParams; MAX_OSCILLATORS],
}

impl Default for StitcherParams {
    fn default() -> Self {
        Self {
            num_oscs: MAX_OSCILLATORS,
            stutters: [1; MAX_OSCILLATORS],
            oscs: [GendyParams::default(); MAX_OSCILLATORS],
        }
    }
}

/// Round-robin sequencer over a bank of [`GendyOscillator`]s.
///
/// # Example
///
/// ```rust
/// use grandy_core::{Stitcher, StitcherParams};
///
/// let mut stitcher = Stitcher::new(1);
/// let params = StitcherParams::default();
///
/// for _ in 0..1000 {
///     let sample = stitcher.advance(&params);
///     assert!(sample.is_finite());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Stitcher {
    oscs: [GendyOscillator; MAX_OSCILLATORS],
    /// Index of the oscillator currently being driven.
    current: usize,
    /// Cycles left before the next hand-off.
    stutter_left: u32,
    /// Crossfade state.
    fading: bool,
    fade_phase: f32,
    fade_speed: f32,
    fade_from: f32,
    fade_to: f32,
}

impl Stitcher {
    /// Create a stitcher; each oscillator gets its own walk stream derived
    /// from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            oscs: core::array::from_fn(|i| GendyOscillator::new(seed.wrapping_add(i as u64))),
            current: 0,
            stutter_left: 1,
            fading: false,
            fade_phase: 0.0,
            fade_speed: 0.0,
            fade_from: 0.0,
            fade_to: 0.0,
        }
    }

    /// Index of the oscillator currently playing (or being faded into).
    pub fn current(&self) -> usize {
        self.current
    }

    /// True while a hand-off crossfade is in progress.
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Borrow an oscillator slot, e.g. for host-side voice lights.
    pub fn oscillator(&self, i: usize) -> &GendyOscillator {
        &self.oscs[i]
    }

    /// Advance one tick and produce one output sample.
    ///
    /// Exactly one oscillator advances per tick while playing; during a
    /// crossfade only the two latched samples are blended and every
    /// oscillator holds still.
    pub fn advance(&mut self, p: &StitcherParams) -> f32 {
        debug_assert!(
            (1..=MAX_OSCILLATORS).contains(&p.num_oscs),
            "oscillator count out of range: {}",
            p.num_oscs
        );

        if self.fading {
            let out = (1.0 - self.fade_phase) * self.fade_from + self.fade_phase * self.fade_to;
            self.fade_phase += self.fade_speed;
            if self.fade_phase >= 1.0 {
                self.fading = false;
            }
            return out;
        }

        let out = self.oscs[self.current].advance(&p.oscs[self.current]);

        if self.oscs[self.current].cycle_complete() {
            self.stutter_left = self.stutter_left.saturating_sub(1);
            if self.stutter_left == 0 {
                // Hand off: latch the departing sample, pull the incoming
                // oscillator's first sample, and crossfade at the departing
                // oscillator's segment rate.
                self.fade_from = out;
                self.fade_speed = self.oscs[self.current].speed();
                self.current = (self.current + 1) % p.num_oscs;
                self.fade_to = self.oscs[self.current].advance(&p.oscs[self.current]);
                self.stutter_left = p.stutters[self.current].max(1);
                self.fade_phase = 0.0;
                self.fading = true;
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> StitcherParams {
        // High frequency bounds keep cycles short so tests see many
        // hand-offs in few ticks.
        let osc = GendyParams {
            num_points: 4,
            min_freq: 500.0,
            max_freq: 1000.0,
            grain_on: false,
            ..GendyParams::default()
        };
        StitcherParams {
            num_oscs: 4,
            stutters: [1; MAX_OSCILLATORS],
            oscs: [osc; MAX_OSCILLATORS],
        }
    }

    #[test]
    fn hand_offs_cycle_round_robin() {
        let mut st = Stitcher::new(3);
        let p = fast_params();

        let mut order = Vec::new();
        let mut prev = st.current();
        for _ in 0..200_000 {
            st.advance(&p);
            if st.current() != prev {
                order.push(st.current());
                prev = st.current();
            }
        }

        assert!(order.len() >= 8, "too few hand-offs: {}", order.len());
        for pair in order.windows(2) {
            assert_eq!(pair[1], (pair[0] + 1) % p.num_oscs);
        }
    }

    #[test]
    fn no_oscillator_advances_during_fade() {
        let mut st = Stitcher::new(6);
        let p = fast_params();

        // Run until a crossfade starts.
        let mut guard = 0;
        while !st.is_fading() {
            st.advance(&p);
            guard += 1;
            assert!(guard < 500_000, "no crossfade ever started");
        }

        let phases: Vec<f32> = (0..MAX_OSCILLATORS).map(|i| st.oscillator(i).phase()).collect();
        st.advance(&p);
        if st.is_fading() {
            for (i, &ph) in phases.iter().enumerate() {
                assert_eq!(st.oscillator(i).phase(), ph, "oscillator {i} moved");
            }
        }
    }

    #[test]
    fn fade_output_spans_latched_endpoints() {
        let mut st = Stitcher::new(9);
        let p = fast_params();

        let mut last_playing = 0.0;
        let mut guard = 0;
        while !st.is_fading() {
            last_playing = st.advance(&p);
            guard += 1;
            assert!(guard < 500_000, "no crossfade ever started");
        }

        // First fading tick outputs the latched pre-hand-off sample.
        let first_fade = st.advance(&p);
        assert!(
            (first_fade - last_playing).abs() < 1e-6,
            "fade does not start at the departing sample"
        );

        // Remaining fade output stays between the two endpoints.
        let mut fade = Vec::new();
        while st.is_fading() {
            fade.push(st.advance(&p));
            assert!(fade.len() < 1_000_000, "crossfade never completed");
        }
        if fade.len() >= 2 {
            let a = first_fade;
            let b = *fade.last().unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for &v in &fade {
                assert!(v >= lo - 1e-5 && v <= hi + 1e-5, "fade left [{lo}, {hi}]: {v}");
            }
        }
    }

    #[test]
    fn stutter_counts_delay_hand_offs() {
        let p_single = fast_params();
        let mut p_stutter = fast_params();
        p_stutter.stutters = [4; MAX_OSCILLATORS];

        let count_fades = |params: &StitcherParams| {
            let mut st = Stitcher::new(12);
            let mut fades = 0u32;
            let mut was_fading = false;
            for _ in 0..300_000 {
                st.advance(params);
                if st.is_fading() && !was_fading {
                    fades += 1;
                }
                was_fading = st.is_fading();
            }
            fades
        };

        let single = count_fades(&p_single);
        let stuttered = count_fades(&p_stutter);
        assert!(single > 0 && stuttered > 0);
        assert!(
            stuttered * 2 < single,
            "stutter did not slow hand-offs: {stuttered} vs {single}"
        );
    }
}
