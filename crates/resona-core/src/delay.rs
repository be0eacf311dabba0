//! Multichannel fixed-lag delay lines.
//!
//! A [`DelayLine`] withholds each channel's samples for a fixed number of
//! sample periods (the *lag*). It is the primitive everything else in the
//! network is built on: the lowpass taps, both allpass variants, and the
//! reverberator's input and feedback delays.
//!
//! Each channel owns a ring buffer of exactly `lag` samples, allocated at
//! construction and never resized. Every call writes one sample and reads
//! one sample, so the FIFO length is invariant across the unit's lifetime
//! and the first `lag` calls return the zero-initialized tail.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::effect::FrameEffect;
use crate::error::{ConfigError, check_channels};
use crate::frame::Frame;

/// One channel's FIFO: a ring buffer of exactly `lag` samples.
#[derive(Debug, Clone)]
struct Fifo {
    buf: Vec<f32>,
    pos: usize,
}

impl Fifo {
    fn new(lag: usize) -> Self {
        Self {
            buf: vec![0.0; lag],
            pos: 0,
        }
    }

    /// Read the oldest sample, overwrite it with the newest, advance.
    #[inline]
    fn exchange(&mut self, input: f32) -> f32 {
        let output = self.buf[self.pos];
        self.buf[self.pos] = input;
        self.pos += 1;
        if self.pos == self.buf.len() {
            self.pos = 0;
        }
        output
    }

    fn clear(&mut self) {
        self.buf.fill(0.0);
        self.pos = 0;
    }
}

/// Multichannel fixed-lag FIFO delay.
///
/// Output equals input delayed by exactly the configured lag; channels are
/// independent. Construction allocates, [`process`](FrameEffect::process)
/// never does.
///
/// # Example
///
/// ```rust
/// use resona_core::{DelayLine, Frame, FrameEffect};
///
/// let mut line = DelayLine::new(1, 3).unwrap();
/// assert_eq!(line.process(&Frame::from_slice(&[1.0]))[0], 0.0);
/// assert_eq!(line.process(&Frame::from_slice(&[0.0]))[0], 0.0);
/// assert_eq!(line.process(&Frame::from_slice(&[0.0]))[0], 0.0);
/// assert_eq!(line.process(&Frame::from_slice(&[0.0]))[0], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DelayLine {
    lines: Vec<Fifo>,
}

impl DelayLine {
    /// Create a delay line with a single lag shared by all channels.
    ///
    /// # Errors
    ///
    /// Rejects a channel count of 0 or above the fixed capacity, and a
    /// lag of 0 samples.
    pub fn new(channels: usize, lag: usize) -> Result<Self, ConfigError> {
        check_channels(channels)?;
        if lag == 0 {
            return Err(ConfigError::ZeroLag);
        }
        Ok(Self {
            lines: (0..channels).map(|_| Fifo::new(lag)).collect(),
        })
    }

    /// Create a delay line with an individual lag per channel.
    ///
    /// Mutually irregular lags decorrelate the channels, which is what the
    /// reverberator's feedback bank relies on to avoid periodic echoes.
    ///
    /// # Errors
    ///
    /// Rejects an empty lag table, a table longer than the fixed channel
    /// capacity, and any lag of 0 samples.
    pub fn with_lags(lags: &[usize]) -> Result<Self, ConfigError> {
        if lags.is_empty() {
            return Err(ConfigError::EmptyLagTable);
        }
        check_channels(lags.len())?;
        if lags.contains(&0) {
            return Err(ConfigError::ZeroLag);
        }
        Ok(Self {
            lines: lags.iter().map(|&lag| Fifo::new(lag)).collect(),
        })
    }

    /// The lag, in sample periods, of the given channel.
    pub fn lag(&self, channel: usize) -> usize {
        self.lines[channel].buf.len()
    }
}

impl FrameEffect for DelayLine {
    /// Push each channel's input sample, pop and return the oldest.
    fn process(&mut self, input: &Frame) -> Frame {
        assert_eq!(
            input.channels(),
            self.lines.len(),
            "delay line built for {} channels fed a {}-channel frame",
            self.lines.len(),
            input.channels()
        );
        let mut output = Frame::silent(self.lines.len());
        for (ch, line) in self.lines.iter_mut().enumerate() {
            output[ch] = line.exchange(input[ch]);
        }
        output
    }

    fn channels(&self) -> usize {
        self.lines.len()
    }

    fn reset(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }
}
