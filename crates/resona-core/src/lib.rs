//! Resona Core - DSP primitives for feedback delay network reverberation
//!
//! This crate provides the building blocks the resona reverberator is
//! assembled from, designed for real-time audio processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Frames
//!
//! - [`Frame`] - one sample per channel, up to [`MAX_CHANNELS`] channels,
//!   produced and consumed atomically by every processing unit
//!
//! ## Processing Units
//!
//! - [`FrameEffect`] - the shared "process one frame" contract
//! - [`DelayLine`] - multichannel fixed-lag FIFO delay
//! - [`MovingAverage`] - 5-tap moving-average FIR lowpass
//! - [`Allpass`] - second-order allpass diffuser (state-variable form)
//! - [`DelayLineAllpass`] - the same diffuser built from delay lines
//!
//! ## Matrices
//!
//! - [`Mat`] - fixed-size matrix for channel distribution and modal
//!   feedback mixing, dimension-checked at compile time
//!
//! ## Utilities
//!
//! - [`flush_denormal`], [`db_to_linear`], [`linear_to_db`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! resona-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: all state is allocated at construction; `process`
//!   never allocates, blocks, or suspends
//! - **Fail-fast configuration**: channel counts and delay lags are
//!   validated when a unit is built, never silently truncated
//! - **No dependencies on std**: pure `no_std` with `libm` for math

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod allpass;
pub mod delay;
pub mod effect;
pub mod error;
pub mod frame;
pub mod lowpass;
pub mod math;
pub mod matrix;

// Re-export main types at crate root
pub use allpass::{Allpass, DelayLineAllpass, MAX_REFLECTION};
pub use delay::DelayLine;
pub use effect::FrameEffect;
pub use error::ConfigError;
pub use frame::{Frame, MAX_CHANNELS};
pub use lowpass::MovingAverage;
pub use math::{db_to_linear, flush_denormal, linear_to_db};
pub use matrix::Mat;
