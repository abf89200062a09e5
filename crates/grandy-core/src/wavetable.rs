//! Single-cycle wavetable used for grain envelopes and grain sources.
//!
//! Holds one normalized cycle of a shape in a fixed-size table and supports
//! fractional-index lookup with linear interpolation. Shape switching
//! regenerates the table in place and is memoized, so re-selecting the
//! current shape on every tick costs nothing.

use core::f32::consts::PI;
use libm::{cosf, floorf, sinf};

/// Number of samples in one table cycle.
pub const TABLE_SIZE: usize = 2048;

/// Tukey window taper fraction.
const TUKEY_ALPHA: f32 = 0.5;

/// Envelope/grain shapes available in a [`Wavetable`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvShape {
    /// One cycle of a sine wave — bipolar, periodic across the wrap.
    #[default]
    Sine,
    /// Linear ramp up to 1 at the centre, then back down.
    Triangle,
    /// Raised-cosine window — zero at both edges, periodic across the wrap.
    Hann,
    /// Parabolic window.
    Welch,
    /// Flat top with raised-cosine tapers on either side.
    Tukey,
}

/// Fixed-size lookup table holding one cycle of an [`EnvShape`].
///
/// The domain `[0, 1)` maps onto the table; [`Wavetable::get`] interpolates
/// linearly between the two nearest entries, with the upper index taken
/// modulo the table length at the wrap boundary.
///
/// # Example
///
/// ```rust
/// use grandy_core::{EnvShape, Wavetable};
///
/// let table = Wavetable::new(EnvShape::Hann);
/// let mid = table.get(0.5);
/// assert!((mid - 1.0).abs() < 1e-3);
/// ```
#[derive(Clone)]
pub struct Wavetable {
    table: [f32; TABLE_SIZE],
    shape: EnvShape,
}

impl Default for Wavetable {
    fn default() -> Self {
        Self::new(EnvShape::Sine)
    }
}

impl core::fmt::Debug for Wavetable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wavetable")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl Wavetable {
    /// Create a table filled with one cycle of the given shape.
    pub fn new(shape: EnvShape) -> Self {
        let mut wt = Self {
            table: [0.0; TABLE_SIZE],
            shape,
        };
        wt.fill(shape);
        wt
    }

    /// Get the current shape.
    pub fn shape(&self) -> EnvShape {
        self.shape
    }

    /// Switch to a new shape, regenerating the table.
    ///
    /// No-op when `shape` is already the current shape.
    pub fn set_shape(&mut self, shape: EnvShape) {
        if self.shape != shape {
            self.shape = shape;
            self.fill(shape);
        }
    }

    /// Read the table at normalized position `x` in `[0, 1)`.
    ///
    /// Maps `x` to a fractional table index and linearly interpolates
    /// between the two nearest entries. The upper neighbour of the final
    /// entry wraps to index 0.
    #[inline]
    pub fn get(&self, x: f32) -> f32 {
        debug_assert!((0.0..1.0).contains(&x), "table phase out of range: {x}");
        let pos = x * TABLE_SIZE as f32;
        let base = floorf(pos);
        let frac = pos - base;
        let i0 = base as usize % TABLE_SIZE;
        let i1 = (i0 + 1) % TABLE_SIZE;
        (1.0 - frac) * self.table[i0] + frac * self.table[i1]
    }

    /// Read the table at an integer index.
    #[inline]
    pub fn at(&self, i: usize) -> f32 {
        self.table[i % TABLE_SIZE]
    }

    fn fill(&mut self, shape: EnvShape) {
        let n = TABLE_SIZE as f32;
        for (i, slot) in self.table.iter_mut().enumerate() {
            let t = i as f32 / n;
            *slot = match shape {
                EnvShape::Sine => sinf(2.0 * PI * t),
                EnvShape::Triangle => {
                    if t < 0.5 {
                        2.0 * t
                    } else {
                        2.0 - 2.0 * t
                    }
                }
                EnvShape::Hann => 0.5 * (1.0 - cosf(2.0 * PI * t)),
                EnvShape::Welch => {
                    let d = 2.0 * t - 1.0;
                    1.0 - d * d
                }
                EnvShape::Tukey => tukey(t),
            };
        }
    }
}

/// Tukey window: raised-cosine tapers over the first and last `α/2` of the
/// cycle, flat 1.0 in between.
fn tukey(t: f32) -> f32 {
    let half = TUKEY_ALPHA / 2.0;
    if t < half {
        0.5 * (1.0 + cosf(PI * (2.0 * t / TUKEY_ALPHA - 1.0)))
    } else if t <= 1.0 - half {
        1.0
    } else {
        0.5 * (1.0 + cosf(PI * (2.0 * t / TUKEY_ALPHA - 2.0 / TUKEY_ALPHA + 1.0)))
    }
}
