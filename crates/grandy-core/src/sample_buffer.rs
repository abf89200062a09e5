//! Fixed-capacity recording loop used as the grain-echo source.
//!
//! The buffer keeps two copies of the recorded audio: a live copy that the
//! synthesis modulation writes into, and a pristine snapshot used to undo
//! those writes on reset. Recording smooths the loop seam by cross-fading
//! the tail of the active region back to the first sample, so looped
//! playback is click-free.
//!
//! # Memory
//!
//! Both copies are heap-allocated once at construction and never resized.
//! No allocations occur during audio processing.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// Length of the loop-smoothing cross-fade, in samples.
pub const LOOP_FADE_LEN: usize = 50;

/// Circular record/playback buffer with a pristine snapshot.
///
/// # Example
///
/// ```rust
/// use grandy_core::SampleBuffer;
///
/// let mut buf = SampleBuffer::new(1000);
/// buf.begin_record(200);
/// while buf.is_recording() {
///     buf.record(0.25);
/// }
/// assert!((buf.read(10) - 0.25).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    /// Playback copy, mutated in place by modulation writes.
    live: Vec<f32>,
    /// Snapshot of the recording, restored on reset.
    pristine: Vec<f32>,
    /// Write cursor while recording.
    cursor: usize,
    /// Active loop length, `<=` capacity.
    active_len: usize,
    recording: bool,
}

impl SampleBuffer {
    /// Create a buffer with the given capacity in samples.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample buffer capacity must be non-zero");
        Self {
            live: vec![0.0; capacity],
            pristine: vec![0.0; capacity],
            cursor: 0,
            active_len: capacity,
            recording: false,
        }
    }

    /// Total capacity in samples.
    pub fn capacity(&self) -> usize {
        self.live.len()
    }

    /// Active loop length in samples.
    pub fn len(&self) -> usize {
        self.active_len
    }

    /// True when no samples are active.
    pub fn is_empty(&self) -> bool {
        self.active_len == 0
    }

    /// True while a recording pass is in progress.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Start a recording pass over the first `active_len` samples.
    ///
    /// The active length is clamped to capacity and must exceed the
    /// smoothing window for the seam fade to have room.
    pub fn begin_record(&mut self, active_len: usize) {
        let len = active_len.min(self.capacity());
        debug_assert!(
            len > LOOP_FADE_LEN,
            "active length {len} leaves no room for the loop fade"
        );
        self.active_len = len;
        self.cursor = 0;
        self.recording = true;
    }

    /// Write one input sample at the cursor.
    ///
    /// When the cursor reaches the smoothing window at the end of the
    /// active region, the remaining slots are filled with a linear fade
    /// from the last recorded value back to the first sample and the pass
    /// ends. No-op when not recording.
    pub fn record(&mut self, sample: f32) {
        if !self.recording {
            return;
        }

        let fade_start = self.active_len.saturating_sub(LOOP_FADE_LEN);
        if self.cursor < fade_start {
            self.live[self.cursor] = sample;
            self.pristine[self.cursor] = sample;
            self.cursor += 1;
            return;
        }

        // Seam fade. Written to both copies so reset stays click-free.
        let from = if self.cursor > 0 {
            self.live[self.cursor - 1]
        } else {
            sample
        };
        let to = self.live[0];
        let mut p = 0.0;
        while self.cursor < self.active_len {
            let v = (1.0 - p) * from + p * to;
            self.live[self.cursor] = v;
            self.pristine[self.cursor] = v;
            p += 1.0 / LOOP_FADE_LEN as f32;
            self.cursor += 1;
        }
        self.recording = false;
    }

    /// Restore the live copy from the pristine snapshot.
    pub fn restore(&mut self) {
        self.live.copy_from_slice(&self.pristine);
    }

    /// Read the sample at `idx`.
    ///
    /// The caller advances its play index modulo [`SampleBuffer::len`];
    /// indices are wrapped at capacity as a hard backstop.
    #[inline]
    pub fn read(&self, idx: usize) -> f32 {
        debug_assert!(idx < self.active_len, "read past active region: {idx}");
        self.live[idx % self.live.len()]
    }

    /// Add `delta` to the sample at `idx`, clamped to `[lo, hi]`.
    ///
    /// This is the amplitude-modulation write the echo engine uses to
    /// permanently imprint its stochastic envelope onto the loop.
    #[inline]
    pub fn modulate_at(&mut self, idx: usize, delta: f32, lo: f32, hi: f32) {
        debug_assert!(idx < self.active_len, "write past active region: {idx}");
        let i = idx % self.live.len();
        self.live[i] = (self.live[i] + delta).clamp(lo, hi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_fills_active_region() {
        let mut buf = SampleBuffer::new(200);
        buf.begin_record(150);
        for _ in 0..150 {
            buf.record(0.5);
        }
        assert!(!buf.is_recording());
        // Tail fade from 0.5 to buffer[0] == 0.5 is still 0.5 everywhere.
        for i in 0..150 {
            assert!((buf.read(i) - 0.5).abs() < 1e-6, "index {i}");
        }
    }

    #[test]
    fn seam_fade_interpolates_tail_to_head() {
        let mut buf = SampleBuffer::new(200);
        buf.begin_record(150);
        // Ramp input: 0, 1, 2, ... so head and tail differ.
        let mut i = 0;
        while buf.is_recording() {
            buf.record(i as f32);
            i += 1;
        }
        // Recording stops once the cursor hits 100; slots 100..150 fade
        // from the last recorded value (99) back to the head (0).
        assert!((buf.read(99) - 99.0).abs() < 1e-6);
        assert!((buf.read(100) - 99.0).abs() < 1e-6);
        let quarter = buf.read(100 + LOOP_FADE_LEN / 4);
        let mid = buf.read(100 + LOOP_FADE_LEN / 2);
        assert!(mid < quarter, "fade is not decreasing");
        assert!((buf.read(149) - 99.0 * (1.0 / LOOP_FADE_LEN as f32)).abs() < 1.0);
    }

    #[test]
    fn restore_undoes_modulation() {
        let mut buf = SampleBuffer::new(100);
        buf.begin_record(90);
        while buf.is_recording() {
            buf.record(0.1);
        }
        buf.modulate_at(5, 0.7, -1.0, 1.0);
        assert!((buf.read(5) - 0.8).abs() < 1e-6);
        buf.restore();
        assert!((buf.read(5) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn modulation_clamps_to_bounds() {
        let mut buf = SampleBuffer::new(100);
        buf.begin_record(90);
        while buf.is_recording() {
            buf.record(0.9);
        }
        buf.modulate_at(3, 10.0, -1.0, 1.0);
        assert!((buf.read(3) - 1.0).abs() < 1e-6);
        buf.modulate_at(3, -10.0, -1.0, 1.0);
        assert!((buf.read(3) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn record_is_noop_when_idle() {
        let mut buf = SampleBuffer::new(100);
        buf.record(0.5);
        assert!(buf.read(0).abs() < 1e-6);
    }
}
