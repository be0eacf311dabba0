//! Second-order allpass diffusers.
//!
//! An allpass filter passes every frequency at unity magnitude while
//! shifting phase, which spreads transient energy in time without
//! coloring the tone - the standard way to densify a reverb tail.
//!
//! Both implementations here realize the same difference equation,
//! parameterized by a reflection coefficient `r` and an angle `theta`
//! (the pole pair sits at radius `r`, angle `±theta`):
//!
//! ```text
//! y[n] = r²·x[n] − 2r·cos(θ)·x[n−1] + x[n−2]
//!                + 2r·cos(θ)·y[n−1] − r²·y[n−2]
//! ```
//!
//! [`Allpass`] keeps the four history terms as per-channel scalars and is
//! the preferred form. [`DelayLineAllpass`] derives them from four
//! [`DelayLine`]s instead; it exists because the rest of the network is
//! delay-line shaped, and the two must stay interchangeable - the test
//! suite pins them sample-for-sample against each other.
//!
//! Stability requires `|r| < 1`; the constructors clamp the coefficient
//! at [`MAX_REFLECTION`] so a hot parameter sweep cannot push the pole
//! pair onto the unit circle.

use libm::cosf;

use crate::delay::DelayLine;
use crate::effect::FrameEffect;
use crate::error::{ConfigError, check_channels};
use crate::frame::{Frame, MAX_CHANNELS};
use crate::math::flush_denormal;

/// Largest reflection coefficient magnitude the filters will accept.
pub const MAX_REFLECTION: f32 = 0.999;

/// Clamp the reflection coefficient and derive the two products the
/// difference equation actually uses.
fn coefficients(reflection: f32, angle: f32) -> (f32, f32, f32) {
    let r = reflection.clamp(-MAX_REFLECTION, MAX_REFLECTION);
    (r, r * r, 2.0 * r * cosf(angle))
}

/// Second-order allpass with explicit per-channel state scalars.
///
/// The history terms `x[n-1], x[n-2], y[n-1], y[n-2]` live in four fixed
/// arrays updated by shift-register assignment each call.
///
/// # Example
///
/// ```rust
/// use resona_core::{Allpass, Frame, FrameEffect};
///
/// let mut diffuser = Allpass::new(2, 0.3, 0.3).unwrap();
/// let out = diffuser.process(&Frame::stereo(1.0, 0.0));
/// assert!((out[0] - 0.09).abs() < 1e-6); // first sample is r²·x[0]
/// ```
#[derive(Debug, Clone)]
pub struct Allpass {
    channels: usize,
    reflection: f32,
    angle: f32,
    r2: f32,
    two_r_cos_theta: f32,
    x1: [f32; MAX_CHANNELS],
    x2: [f32; MAX_CHANNELS],
    y1: [f32; MAX_CHANNELS],
    y2: [f32; MAX_CHANNELS],
}

impl Allpass {
    /// Create the filter.
    ///
    /// # Errors
    ///
    /// Rejects a channel count of 0 or above the fixed capacity.
    pub fn new(channels: usize, reflection: f32, angle: f32) -> Result<Self, ConfigError> {
        check_channels(channels)?;
        let (r, r2, two_r_cos_theta) = coefficients(reflection, angle);
        Ok(Self {
            channels,
            reflection: r,
            angle,
            r2,
            two_r_cos_theta,
            x1: [0.0; MAX_CHANNELS],
            x2: [0.0; MAX_CHANNELS],
            y1: [0.0; MAX_CHANNELS],
            y2: [0.0; MAX_CHANNELS],
        })
    }

    /// Retune the reflection coefficient and angle without clearing state.
    ///
    /// The reflection coefficient is clamped to `±`[`MAX_REFLECTION`].
    pub fn set_coefficients(&mut self, reflection: f32, angle: f32) {
        let (r, r2, two_r_cos_theta) = coefficients(reflection, angle);
        self.reflection = r;
        self.angle = angle;
        self.r2 = r2;
        self.two_r_cos_theta = two_r_cos_theta;
    }

    /// The effective (clamped) reflection coefficient.
    pub fn reflection(&self) -> f32 {
        self.reflection
    }

    /// The pole angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl FrameEffect for Allpass {
    fn process(&mut self, input: &Frame) -> Frame {
        assert_eq!(
            input.channels(),
            self.channels,
            "allpass built for {} channels fed a {}-channel frame",
            self.channels,
            input.channels()
        );
        let mut output = Frame::silent(self.channels);
        for ch in 0..self.channels {
            let x = input[ch];
            let y = self.r2 * x - self.two_r_cos_theta * self.x1[ch] + self.x2[ch]
                + self.two_r_cos_theta * self.y1[ch]
                - self.r2 * self.y2[ch];

            self.x2[ch] = self.x1[ch];
            self.x1[ch] = x;
            self.y2[ch] = self.y1[ch];
            self.y1[ch] = flush_denormal(y);

            output[ch] = y;
        }
        output
    }

    fn channels(&self) -> usize {
        self.channels
    }

    fn reset(&mut self) {
        self.x1 = [0.0; MAX_CHANNELS];
        self.x2 = [0.0; MAX_CHANNELS];
        self.y1 = [0.0; MAX_CHANNELS];
        self.y2 = [0.0; MAX_CHANNELS];
    }
}

/// Second-order allpass built from delay lines.
///
/// Two feed-forward lines (lags 1 and 2) tap the raw input; two feedback
/// lines (lags 1 and 2) tap a stored copy of the previous output, which
/// is refreshed after every call. Output matches [`Allpass`] exactly for
/// the same coefficients and input.
///
/// With the crate's `tracing` feature enabled, every 50th call emits
/// channel 0's output as a `trace!` event - observability only, no effect
/// on the signal path.
#[derive(Debug, Clone)]
pub struct DelayLineAllpass {
    reflection: f32,
    angle: f32,
    r2: f32,
    two_r_cos_theta: f32,
    ff1: DelayLine,
    ff2: DelayLine,
    fb1: DelayLine,
    fb2: DelayLine,
    feedback: Frame,
    #[cfg(feature = "tracing")]
    calls: u64,
}

impl DelayLineAllpass {
    /// Create the filter.
    ///
    /// # Errors
    ///
    /// Rejects a channel count of 0 or above the fixed capacity.
    pub fn new(channels: usize, reflection: f32, angle: f32) -> Result<Self, ConfigError> {
        let (r, r2, two_r_cos_theta) = coefficients(reflection, angle);
        Ok(Self {
            reflection: r,
            angle,
            r2,
            two_r_cos_theta,
            ff1: DelayLine::new(channels, 1)?,
            ff2: DelayLine::new(channels, 2)?,
            fb1: DelayLine::new(channels, 1)?,
            fb2: DelayLine::new(channels, 2)?,
            feedback: Frame::silent(channels),
            #[cfg(feature = "tracing")]
            calls: 0,
        })
    }

    /// Retune the reflection coefficient and angle without clearing state.
    ///
    /// The reflection coefficient is clamped to `±`[`MAX_REFLECTION`].
    pub fn set_coefficients(&mut self, reflection: f32, angle: f32) {
        let (r, r2, two_r_cos_theta) = coefficients(reflection, angle);
        self.reflection = r;
        self.angle = angle;
        self.r2 = r2;
        self.two_r_cos_theta = two_r_cos_theta;
    }

    /// The effective (clamped) reflection coefficient.
    pub fn reflection(&self) -> f32 {
        self.reflection
    }

    /// The pole angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }
}

impl FrameEffect for DelayLineAllpass {
    fn process(&mut self, input: &Frame) -> Frame {
        let mut output = *input;
        output.scale(self.r2);

        let mut tap = self.ff1.process(input);
        tap.scale(-self.two_r_cos_theta);
        output.add(&tap);

        output.add(&self.ff2.process(input));

        let mut tap = self.fb1.process(&self.feedback);
        tap.scale(self.two_r_cos_theta);
        output.add(&tap);

        let mut tap = self.fb2.process(&self.feedback);
        tap.scale(-self.r2);
        output.add(&tap);

        // The feedback lines must see next call's y[n-1] with subnormals
        // already flushed, same as the scalar variant's stored state.
        let mut stored = output;
        stored.flush_denormals();
        self.feedback = stored;

        #[cfg(feature = "tracing")]
        {
            self.calls += 1;
            if self.calls % 50 == 0 {
                tracing::trace!(channel0 = output[0], "diffuser output");
            }
        }

        output
    }

    fn channels(&self) -> usize {
        self.ff1.channels()
    }

    fn reset(&mut self) {
        self.ff1.reset();
        self.ff2.reset();
        self.fb1.reset();
        self.fb2.reset();
        self.feedback = Frame::silent(self.ff1.channels());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libm::sinf;

    /// A deterministic probe with an impulse, a step edge, and a tone.
    fn probe_signal(len: usize) -> impl Iterator<Item = f32> {
        (0..len).map(|n| {
            let tone = 0.4 * sinf(n as f32 * core::f32::consts::TAU / 37.0);
            let impulse = if n == 0 { 1.0 } else { 0.0 };
            let step = if n >= 100 && n < 140 { 0.25 } else { 0.0 };
            tone + impulse + step
        })
    }

    #[test]
    fn test_variants_match_sample_for_sample() {
        let mut scalar = Allpass::new(3, 0.3, 0.3).unwrap();
        let mut queued = DelayLineAllpass::new(3, 0.3, 0.3).unwrap();

        for x in probe_signal(2000) {
            let frame = Frame::from_slice(&[x, -x, 0.5 * x]);
            let a = scalar.process(&frame);
            let b = queued.process(&frame);
            for ch in 0..3 {
                assert!(
                    (a[ch] - b[ch]).abs() < 1e-6,
                    "variants diverged: {} vs {}",
                    a[ch],
                    b[ch]
                );
            }
        }
    }

    #[test]
    fn test_first_output_is_r_squared_scaled_input() {
        let mut filter = Allpass::new(1, 0.5, 0.7).unwrap();
        let out = filter.process(&Frame::from_slice(&[2.0]));
        assert!((out[0] - 0.5).abs() < 1e-6); // r²·x = 0.25·2.0
    }

    #[test]
    fn test_unity_magnitude_for_sinusoid() {
        // Steady-state RMS out must equal RMS in at any probe frequency.
        for period in [8.0f32, 16.0, 32.0, 64.0] {
            let mut filter = Allpass::new(1, 0.3, 0.3).unwrap();
            let omega = core::f32::consts::TAU / period;

            // Let the transient die out.
            let mut n = 0u32;
            for _ in 0..4000 {
                filter.process(&Frame::from_slice(&[sinf(n as f32 * omega)]));
                n += 1;
            }

            // Integrate over whole periods.
            let window = (period as usize) * 8;
            let mut in_energy = 0.0f64;
            let mut out_energy = 0.0f64;
            for _ in 0..window {
                let x = sinf(n as f32 * omega);
                let y = filter.process(&Frame::from_slice(&[x]))[0];
                in_energy += f64::from(x * x);
                out_energy += f64::from(y * y);
                n += 1;
            }

            let ratio = libm::sqrt(out_energy / in_energy);
            assert!(
                (ratio - 1.0).abs() < 0.02,
                "gain at period {period} was {ratio}"
            );
        }
    }

    #[test]
    fn test_reflection_clamped_below_unity() {
        let mut filter = Allpass::new(1, 1.5, 0.3).unwrap();
        assert_eq!(filter.reflection(), MAX_REFLECTION);

        filter.set_coefficients(-2.0, 0.3);
        assert_eq!(filter.reflection(), -MAX_REFLECTION);

        let mut queued = DelayLineAllpass::new(1, 1.5, 0.3).unwrap();
        assert_eq!(queued.reflection(), MAX_REFLECTION);
        queued.set_coefficients(0.4, 0.1);
        assert_eq!(queued.reflection(), 0.4);
    }

    #[test]
    fn test_silence_stays_silent() {
        let mut filter = Allpass::new(2, 0.3, 0.3).unwrap();
        for _ in 0..100 {
            let out = filter.process(&Frame::silent(2));
            assert_eq!(out.as_slice(), &[0.0, 0.0]);
        }
    }

    #[test]
    fn test_reset_clears_both_variants() {
        let mut scalar = Allpass::new(1, 0.3, 0.3).unwrap();
        let mut queued = DelayLineAllpass::new(1, 0.3, 0.3).unwrap();

        for x in probe_signal(64) {
            scalar.process(&Frame::from_slice(&[x]));
            queued.process(&Frame::from_slice(&[x]));
        }
        scalar.reset();
        queued.reset();

        let silent = Frame::from_slice(&[0.0]);
        assert_eq!(scalar.process(&silent)[0], 0.0);
        assert_eq!(queued.process(&silent)[0], 0.0);
    }

    #[test]
    fn test_rejects_over_capacity() {
        assert!(Allpass::new(9, 0.3, 0.3).is_err());
        assert!(DelayLineAllpass::new(0, 0.3, 0.3).is_err());
    }

    #[test]
    fn test_decays_to_exact_zero_after_input_stops() {
        let mut filter = Allpass::new(1, 0.9, 0.3).unwrap();
        for x in probe_signal(500) {
            filter.process(&Frame::from_slice(&[x]));
        }

        let mut out = 1.0f32;
        for _ in 0..100_000 {
            out = filter.process(&Frame::from_slice(&[0.0]))[0];
            assert!(
                out == 0.0 || out.abs() > f32::MIN_POSITIVE,
                "subnormal leaked into the output: {out:e}"
            );
        }
        assert_eq!(out, 0.0, "tail should have flushed to exact zero");
    }
}
