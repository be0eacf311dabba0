//! Resona Reverb - a fixed-topology feedback delay network
//!
//! The reverberator takes one stereo frame per call and returns one
//! stereo frame, running an 8-channel internal network: input delay →
//! input distribution → feedback-bank injection → allpass diffusion →
//! modal feedback matrix → output distribution, with the matrix output
//! retained as the next call's feedback state.
//!
//! The network's character lives entirely in its tuning tables
//! ([`tuning`]): the delay lags, the distribution matrices, and the
//! modal basis and gains whose contraction keeps the closed loop stable.
//! Retuning means replacing those tables; construction validates every
//! mode gain against the unit circle and rejects tables that would make
//! the loop grow instead of decay.
//!
//! # Example
//!
//! ```rust
//! use resona_reverb::FdnReverb;
//!
//! let mut reverb = FdnReverb::new().expect("default tuning is stable");
//! let (left, right) = reverb.process_stereo(1.0, 0.0);
//! // The dry impulse is still inside the input delay lines.
//! assert_eq!((left, right), (0.0, 0.0));
//! ```
//!
//! # Real-time safety
//!
//! Construction allocates the delay buffers and computes the feedback
//! matrix; after that every call is a fixed amount of arithmetic with no
//! allocation, locking, or I/O. A single instance is not safe for
//! concurrent calls; give each audio thread its own.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod reverb;
pub mod tuning;

pub use reverb::{FdnReverb, ReverbError, modal_feedback_matrix};
pub use tuning::{NETWORK_CHANNELS, STEREO_CHANNELS, Tuning};
