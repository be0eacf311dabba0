//! 5-tap moving-average lowpass filter.
//!
//! A finite-impulse-response lowpass with uniform tap weights: the output
//! is the average of the current sample and the four preceding ones. It
//! attenuates high-frequency content in proportion to how much consecutive
//! samples decorrelate, and passes DC at exactly unity gain.

use crate::delay::DelayLine;
use crate::effect::FrameEffect;
use crate::error::ConfigError;
use crate::frame::Frame;

/// Multichannel 5-tap moving-average FIR lowpass.
///
/// Four internal delay lines with lags 1 through 4 are each fed the same
/// captured copy of the input frame (parallel taps, not a chain):
///
/// ```text
/// y[n] = (x[n] + x[n-1] + x[n-2] + x[n-3] + x[n-4]) / 5
/// ```
#[derive(Debug, Clone)]
pub struct MovingAverage {
    taps: [DelayLine; 4],
}

impl MovingAverage {
    /// Create the filter for the given channel count.
    ///
    /// # Errors
    ///
    /// Rejects a channel count of 0 or above the fixed capacity.
    pub fn new(channels: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            taps: [
                DelayLine::new(channels, 1)?,
                DelayLine::new(channels, 2)?,
                DelayLine::new(channels, 3)?,
                DelayLine::new(channels, 4)?,
            ],
        })
    }
}

impl FrameEffect for MovingAverage {
    fn process(&mut self, input: &Frame) -> Frame {
        let mut acc = *input;
        for tap in &mut self.taps {
            acc.add(&tap.process(input));
        }
        acc.scale(0.2);
        acc
    }

    fn channels(&self) -> usize {
        self.taps[0].channels()
    }

    fn reset(&mut self) {
        for tap in &mut self.taps {
            tap.reset();
        }
    }
}
