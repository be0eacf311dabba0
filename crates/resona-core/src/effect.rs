//! The shared frame-processing contract.
//!
//! Every unit in the network - delay, lowpass, allpass, and the
//! reverberator itself - exposes the same capability: consume one frame,
//! produce one frame, once per sample period. The set of unit kinds is
//! closed and known at composition time, so composition is static; the
//! trait stays object-safe for callers that want a `dyn FrameEffect`
//! boundary anyway.

use crate::frame::Frame;

/// A stateful processor that transforms one frame per sample period.
///
/// # Contract
///
/// - `process` is called once per sample period with a frame whose channel
///   count matches [`channels`](Self::channels); a mismatch fails fast
///   rather than truncating.
/// - `process` completes in O(channel count) with no allocation, blocking,
///   or I/O; all state lives inside the unit.
/// - The returned frame is an owned value. Callers may keep it as long as
///   they like; no internal buffer is ever handed out by reference.
pub trait FrameEffect {
    /// Process one frame, advancing internal state by one sample period.
    fn process(&mut self, input: &Frame) -> Frame;

    /// The channel count this unit was built for.
    fn channels(&self) -> usize;

    /// Clear all retained state back to the just-constructed values
    /// without touching coefficients.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allpass::Allpass;
    use crate::delay::DelayLine;

    #[test]
    fn test_object_safety() {
        let mut delay = DelayLine::new(2, 4).unwrap();
        let mut diffuser = Allpass::new(2, 0.3, 0.3).unwrap();
        let mut units: [&mut dyn FrameEffect; 2] = [&mut delay, &mut diffuser];

        let input = Frame::stereo(1.0, -1.0);
        for unit in &mut units {
            assert_eq!(unit.channels(), 2);
            let out = unit.process(&input);
            assert_eq!(out.channels(), 2);
        }
    }

    #[test]
    fn test_reset_restores_construction_state() {
        let mut line = DelayLine::new(1, 3).unwrap();
        let mut fresh = DelayLine::new(1, 3).unwrap();

        for x in [0.3, -0.7, 0.9] {
            line.process(&Frame::from_slice(&[x]));
        }
        line.reset();

        for x in [0.1, 0.2, 0.3, 0.4] {
            let a = line.process(&Frame::from_slice(&[x]));
            let b = fresh.process(&Frame::from_slice(&[x]));
            assert_eq!(a, b);
        }
    }
}
