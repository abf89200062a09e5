//! Grandy Core - granular dynamic stochastic synthesis engine
//!
//! This crate implements Gendy-style synthesis: waveforms are generated by
//! randomly perturbing a set of breakpoints every cycle and interpolating
//! linearly between them, optionally layered with short grains drawn from a
//! wavetable or a recorded sample loop.
//!
//! # Core Components
//!
//! ## Breakpoint oscillator
//!
//! - [`GendyOscillator`] - the stochastic breakpoint oscillator
//! - [`GendyParams`] - immutable per-tick control input
//!
//! ```rust
//! use grandy_core::{GendyOscillator, GendyParams};
//!
//! let mut osc = GendyOscillator::new(0xBEEF);
//! let params = GendyParams::default();
//!
//! let sample = osc.advance(&params);
//! ```
//!
//! ## Wavetables and random walks
//!
//! - [`Wavetable`] / [`EnvShape`] - grain windows and grain sources
//! - [`RandomWalk`] / [`BoundaryMode`] / [`StepDistribution`] - bounded
//!   stochastic stepping for the breakpoint mutations
//!
//! ## Grain echo
//!
//! - [`SampleBuffer`] - fixed-capacity recording loop with seam smoothing
//! - [`GrainEcho`] / [`GrainEchoParams`] - stochastic granular mangling of
//!   recorded audio
//!
//! ## Stitching
//!
//! - [`Stitcher`] / [`StitcherParams`] - sequences up to four oscillators
//!   end-to-end with stutter repeats and crossfaded hand-offs
//!
//! # Real-time behaviour
//!
//! One call to an engine's `advance` consumes the tick's control input and
//! produces one output sample in bounded, constant time: no allocation, no
//! blocking, no panicking control flow. The only heap use is the sample
//! loop storage, allocated once at construction. Control values are
//! expected pre-clamped by the host-facing layer; preconditions are
//! debug-asserted only.
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! grandy-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod echo;
pub mod oscillator;
pub mod sample_buffer;
pub mod stitcher;
pub mod walk;
pub mod wavetable;

// Re-export main types at crate root
pub use echo::{GrainEcho, GrainEchoParams, MAX_ECHO_POINTS, MAX_SAMPLE_LEN};
pub use oscillator::{GendyOscillator, GendyParams, MAX_BREAKPOINTS};
pub use sample_buffer::{LOOP_FADE_LEN, SampleBuffer};
pub use stitcher::{MAX_OSCILLATORS, Stitcher, StitcherParams};
pub use walk::{BoundaryMode, RandomWalk, StepDistribution, reflect};
pub use wavetable::{EnvShape, TABLE_SIZE, Wavetable};
