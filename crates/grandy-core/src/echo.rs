//! Grain echo: stochastic granular mangling of a recorded loop.
//!
//! Where the breakpoint oscillator synthesizes a waveform from nothing, the
//! grain echo starts from recorded audio. It plays the loop back while a
//! bounded random walk sweeps a windowed amplitude envelope across it,
//! writing each modulation permanently into the buffer — every pass over
//! the loop deforms it a little further. A reset trigger restores the
//! pristine recording.

use libm::floorf;

use crate::sample_buffer::SampleBuffer;
use crate::walk::{BoundaryMode, RandomWalk, StepDistribution};
use crate::wavetable::{EnvShape, Wavetable};

/// Capacity of the recording loop in samples (one second at 44.1 kHz).
pub const MAX_SAMPLE_LEN: usize = 44_100;

/// Breakpoint storage capacity for the echo walk.
pub const MAX_ECHO_POINTS: usize = 4096;

/// Wrap a phase accumulator into `[0, 1)`.
#[inline]
fn wrap01(x: f32) -> f32 {
    x - floorf(x)
}

/// Per-tick control input for a [`GrainEcho`].
#[derive(Clone, Copy, Debug)]
pub struct GrainEchoParams {
    /// Active loop length in samples, `LOOP_FADE_LEN < sample_length <= MAX_SAMPLE_LEN`.
    pub sample_length: usize,
    /// Samples between breakpoints; the breakpoint count follows from the
    /// loop length divided by this spacing.
    pub point_spacing: usize,
    /// Largest amplitude mutation per breakpoint cycle.
    pub max_amp_step: f32,
    /// Largest duration mutation per breakpoint cycle.
    pub max_dur_step: f32,
    /// When false, the amplitude walk restarts from zero on every mutation
    /// instead of accumulating from its previous value.
    pub accumulate: bool,
    /// Boundary policy for the breakpoint walks.
    pub boundary: BoundaryMode,
    /// Distribution transform for the breakpoint walks.
    pub distribution: StepDistribution,
    /// Grain window shape.
    pub envelope: EnvShape,
    /// Clamp range (`±mod_bounds`) for the in-place buffer writes.
    pub mod_bounds: f32,
}

impl Default for GrainEchoParams {
    fn default() -> Self {
        Self {
            sample_length: MAX_SAMPLE_LEN,
            point_spacing: 1500,
            max_amp_step: 0.05,
            max_dur_step: 0.05,
            accumulate: false,
            boundary: BoundaryMode::Clamp,
            distribution: StepDistribution::Linear,
            envelope: EnvShape::Triangle,
            mod_bounds: 1.0,
        }
    }
}

/// Granular echo engine over a recorded sample loop.
///
/// Feed it one input sample per tick; while recording the input is written
/// into the loop, and playback output is produced every tick either way.
///
/// # Example
///
/// ```rust
/// use grandy_core::{GrainEcho, GrainEchoParams};
///
/// let mut echo = GrainEcho::new(1);
/// let params = GrainEchoParams {
///     sample_length: 4000,
///     point_spacing: 400,
///     ..GrainEchoParams::default()
/// };
///
/// echo.begin_record(&params);
/// for _ in 0..4000 {
///     let _ = echo.advance(0.2, &params);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct GrainEcho {
    buffer: SampleBuffer,
    /// Walked per-breakpoint amplitudes in [-1, 1].
    amps: [f32; MAX_ECHO_POINTS],
    /// Walked per-breakpoint duration multipliers in [0.5, 1.5].
    durs: [f32; MAX_ECHO_POINTS],
    /// Current breakpoint cursor.
    index: usize,
    /// Segment phase. Starts at 1.0 so the first tick draws a breakpoint.
    phase: f32,
    /// Envelope interpolation endpoints.
    amp: f32,
    amp_next: f32,
    /// Grain-window phases for the two endpoints.
    g_idx: f32,
    g_idx_next: f32,
    /// Loop playback cursor.
    play_idx: usize,
    /// Grain window table.
    env: Wavetable,
    /// Breakpoint mutation stream.
    walk: RandomWalk,
}

impl GrainEcho {
    /// Create an echo engine with its walk seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            buffer: SampleBuffer::new(MAX_SAMPLE_LEN),
            amps: [0.0; MAX_ECHO_POINTS],
            durs: [1.0; MAX_ECHO_POINTS],
            index: 0,
            phase: 1.0,
            amp: 0.0,
            amp_next: 0.0,
            g_idx: 0.0,
            g_idx_next: 0.5,
            play_idx: 0,
            env: Wavetable::new(EnvShape::Triangle),
            walk: RandomWalk::new(seed),
        }
    }

    /// The recording loop.
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    /// True while a recording pass is in progress.
    pub fn is_recording(&self) -> bool {
        self.buffer.is_recording()
    }

    /// Gate edge: clear the walks to identity, rewind playback, and start
    /// recording input into the loop.
    pub fn begin_record(&mut self, p: &GrainEchoParams) {
        self.clear_walks();
        self.buffer.begin_record(p.sample_length);
        self.play_idx = 0;
    }

    /// Trigger edge: restore the pristine recording and clear the walks.
    pub fn reset(&mut self) {
        self.buffer.restore();
        self.clear_walks();
    }

    fn clear_walks(&mut self) {
        self.amps = [0.0; MAX_ECHO_POINTS];
        self.durs = [1.0; MAX_ECHO_POINTS];
        self.amp = 0.0;
        self.amp_next = 0.0;
    }

    /// Advance one tick: record `input` if a pass is active, imprint the
    /// current envelope value onto the loop, and return the playback
    /// sample.
    pub fn advance(&mut self, input: f32, p: &GrainEchoParams) -> f32 {
        debug_assert!(p.sample_length <= self.buffer.capacity());
        debug_assert!(p.point_spacing >= 2, "spacing too small: {}", p.point_spacing);

        self.env.set_shape(p.envelope);

        let num_points = (p.sample_length / p.point_spacing + 1).min(MAX_ECHO_POINTS);
        let env_dur = (p.point_spacing / 2).max(1);

        if self.buffer.is_recording() {
            self.buffer.record(input);
        }

        if self.phase >= 1.0 {
            self.phase -= 1.0;

            self.amp = self.amp_next;
            self.index = (self.index + 1) % num_points;

            let base = if p.accumulate { self.amps[self.index] } else { 0.0 };
            self.amps[self.index] = self.walk.step(
                base,
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

            self.g_idx = self.g_idx_next;
            self.g_idx_next = 0.0;
        }

        // Imprint the windowed envelope onto the loop, then play it back.
        self.buffer.modulate_at(
            self.play_idx,
            self.amp * self.env.get(self.g_idx),
            -p.mod_bounds,
            p.mod_bounds,
        );
        let out = self.buffer.read(self.play_idx);

        self.play_idx = (self.play_idx + 1) % p.sample_length;

        let g_step = 1.0 / (4.0 * env_dur as f32);
        self.g_idx = wrap01(self.g_idx + g_step);
        self.g_idx_next = wrap01(self.g_idx_next + g_step);

        self.phase += 1.0 / (self.durs[self.index] * p.point_spacing as f32);
        out
    }
}
