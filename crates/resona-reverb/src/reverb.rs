//! The feedback delay network reverberator.

use resona_core::{
    Allpass, ConfigError, DelayLine, Frame, FrameEffect, Mat, MovingAverage,
};

use crate::tuning::{NETWORK_CHANNELS, STEREO_CHANNELS, Tuning};

/// Errors raised while constructing the reverberator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReverbError {
    /// A component rejected its configuration.
    Config(ConfigError),
    /// A mode gain sits on or outside the unit circle; the closed loop
    /// would sustain or grow instead of decaying.
    UnstableMode {
        /// Index of the offending entry in the gain table.
        index: usize,
        /// The offending gain.
        gain: f32,
    },
    /// The modal basis has linearly dependent columns and cannot span
    /// the network.
    DegenerateModes,
}

impl From<ConfigError> for ReverbError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl core::fmt::Display for ReverbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "component configuration: {err}"),
            Self::UnstableMode { index, gain } => {
                write!(f, "mode {index} gain {gain} is not strictly inside the unit circle")
            }
            Self::DegenerateModes => write!(f, "modal basis columns are linearly dependent"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ReverbError {}

/// Assemble the modal feedback matrix `Q·diag(gains)·Qᵀ`.
///
/// The raw basis columns are orthonormalized first, so the result is
/// symmetric with eigenvalues exactly `gains`: its spectral norm is
/// `max|gainᵢ|`, and gains strictly inside the unit circle make every
/// pass around the loop a strict contraction. That is the reverberator's
/// stability condition, and it is enforced here rather than assumed -
/// a gain on or outside the circle, or a rank-deficient basis, is a
/// construction error.
///
/// # Errors
///
/// [`ReverbError::UnstableMode`] for the first gain with `|gain| ≥ 1`,
/// [`ReverbError::DegenerateModes`] if the basis is not full rank.
pub fn modal_feedback_matrix(
    vectors: &Mat<NETWORK_CHANNELS, NETWORK_CHANNELS>,
    gains: [f32; NETWORK_CHANNELS],
) -> Result<Mat<NETWORK_CHANNELS, NETWORK_CHANNELS>, ReverbError> {
    for (index, gain) in gains.iter().enumerate() {
        if gain.abs() >= 1.0 {
            return Err(ReverbError::UnstableMode { index, gain: *gain });
        }
    }
    let basis = vectors
        .orthonormalized_columns()
        .ok_or(ReverbError::DegenerateModes)?;
    Ok(basis.matmul(&Mat::diag(gains)).matmul(&basis.transpose()))
}

/// Stereo-in, stereo-out feedback delay network reverb.
///
/// One call processes one sample period. Internally the signal runs
/// through an 8-channel network:
///
/// 1. the stereo input is delayed per channel and projected into the
///    network by the input distribution matrix;
/// 2. the feedback bank delays the previous feedback frame and the
///    result is added to the projected input;
/// 3. the sum is diffused by the allpass;
/// 4. the feedback matrix redistributes the diffused frame across
///    channels while applying the per-mode decay;
/// 5. that product becomes the next call's feedback state and, projected
///    by the output distribution matrix, this call's stereo output.
///
/// # Example
///
/// ```rust
/// use resona_reverb::FdnReverb;
///
/// let mut reverb = FdnReverb::new().unwrap();
/// // Impulse in, then listen to the tail build after the input lag.
/// reverb.process_stereo(1.0, 1.0);
/// let tail: Vec<(f32, f32)> = (0..200)
///     .map(|_| reverb.process_stereo(0.0, 0.0))
///     .collect();
/// assert!(tail[..99].iter().all(|&(l, r)| l == 0.0 && r == 0.0));
/// assert!(tail[99..].iter().any(|&(l, r)| l != 0.0 || r != 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct FdnReverb {
    input_delay: DelayLine,
    feedback_delay: DelayLine,
    damping: MovingAverage,
    diffuser: Allpass,
    input_distribution: Mat<NETWORK_CHANNELS, STEREO_CHANNELS>,
    output_distribution: Mat<STEREO_CHANNELS, NETWORK_CHANNELS>,
    feedback_matrix: Mat<NETWORK_CHANNELS, NETWORK_CHANNELS>,
    feedback: Frame,
}

impl FdnReverb {
    /// Build the reverberator with the shipped default tuning.
    ///
    /// # Errors
    ///
    /// The default tables are validated like any other; see
    /// [`with_tuning`](Self::with_tuning).
    pub fn new() -> Result<Self, ReverbError> {
        Self::with_tuning(&Tuning::default())
    }

    /// Build the reverberator from an explicit tuning.
    ///
    /// # Errors
    ///
    /// Rejects delay tables with zero lags, mode gains on or outside the
    /// unit circle, and a rank-deficient modal basis.
    pub fn with_tuning(tuning: &Tuning) -> Result<Self, ReverbError> {
        let feedback_matrix = modal_feedback_matrix(&tuning.mode_vectors, tuning.mode_gains)?;
        Ok(Self {
            input_delay: DelayLine::with_lags(&tuning.input_lags)?,
            feedback_delay: DelayLine::with_lags(&tuning.feedback_lags)?,
            damping: MovingAverage::new(NETWORK_CHANNELS)?,
            diffuser: Allpass::new(NETWORK_CHANNELS, tuning.reflection, tuning.angle)?,
            input_distribution: tuning.input_distribution,
            output_distribution: tuning.output_distribution,
            feedback_matrix,
            feedback: Frame::silent(NETWORK_CHANNELS),
        })
    }

    /// Process one stereo sample pair.
    ///
    /// The host-facing boundary: equivalent to building a two-channel
    /// frame, calling [`process`](FrameEffect::process), and splitting
    /// the result.
    #[inline]
    pub fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let output = self.process(&Frame::stereo(left, right));
        (output[0], output[1])
    }

    /// Retune the diffuser's reflection coefficient.
    ///
    /// Clamped below unity; see [`resona_core::MAX_REFLECTION`].
    pub fn set_reflection(&mut self, reflection: f32) {
        let angle = self.diffuser.angle();
        self.diffuser.set_coefficients(reflection, angle);
    }

    /// Retune the diffuser's pole angle in radians.
    pub fn set_angle(&mut self, angle: f32) {
        let reflection = self.diffuser.reflection();
        self.diffuser.set_coefficients(reflection, angle);
    }

    /// The diffuser's effective reflection coefficient.
    pub fn reflection(&self) -> f32 {
        self.diffuser.reflection()
    }

    /// The diffuser's pole angle in radians.
    pub fn angle(&self) -> f32 {
        self.diffuser.angle()
    }
}

impl FrameEffect for FdnReverb {
    fn process(&mut self, input: &Frame) -> Frame {
        let delayed = self.input_delay.process(input);
        let mut network = self.input_distribution.mul_frame(&delayed);

        // Advances the damping filter's history against the feedback
        // frame and drops the result: only the lowpass state moves, the
        // loop signal is untouched.
        // TODO: audition `network.add(&damped)` with the damped frame
        // replacing the raw feedback injection below - it darkens the
        // tail, so the swap needs a listening pass before it ships.
        let _ = self.damping.process(&self.feedback);

        network.add(&self.feedback_delay.process(&self.feedback));

        let diffused = self.diffuser.process(&network);

        let mut mixed = self.feedback_matrix.mul_frame(&diffused);
        mixed.flush_denormals();
        self.feedback = mixed;

        self.output_distribution.mul_frame(&mixed)
    }

    fn channels(&self) -> usize {
        STEREO_CHANNELS
    }

    fn reset(&mut self) {
        self.input_delay.reset();
        self.feedback_delay.reset();
        self.damping.reset();
        self.diffuser.reset();
        self.feedback = Frame::silent(NETWORK_CHANNELS);
    }
}
