//! Tuning tables for the reverberator.
//!
//! Everything that gives the network its sound is data: delay lags in
//! sample periods, the two distribution matrices that map the stereo
//! boundary onto the 8-channel network and back, and the modal basis and
//! per-mode gains the feedback matrix is assembled from. Retuning the
//! reverb means shipping a different [`Tuning`]; the gains must stay
//! strictly inside the unit circle or construction rejects the table.
//!
//! All lags are absolute sample counts. There is deliberately no sample
//! rate parameter: rendering the same tables at a different session rate
//! shifts the room's apparent size, and compensating for that is a
//! retuning, not a runtime conversion.

use resona_core::Mat;

/// Channel count of the internal network.
pub const NETWORK_CHANNELS: usize = 8;

/// Channel count of the external boundary.
pub const STEREO_CHANNELS: usize = 2;

/// Per-channel lags of the stereo input delay, in samples.
///
/// Slightly different lags per side keep the early reflections from
/// landing mono.
pub const INPUT_LAGS: [usize; STEREO_CHANNELS] = [100, 120];

/// Lags of the 8-channel feedback delay bank, in samples.
///
/// Mutually irregular lengths so no pair of loop paths lines up into a
/// periodic echo.
pub const FEEDBACK_LAGS: [usize; NETWORK_CHANNELS] =
    [123, 1402, 3860, 375, 3046, 213, 586, 100];

/// Stereo → network distribution matrix (8 rows × 2 columns).
pub const INPUT_DISTRIBUTION: Mat<NETWORK_CHANNELS, STEREO_CHANNELS> = Mat::from_rows([
    [0.094, 0.142],
    [-0.189, 0.124],
    [0.02, 0.161],
    [0.026, 0.023],
    [0.079, -0.068],
    [-0.134, 0.286],
    [0.161, -0.216],
    [0.086, -0.043],
]);

/// Network → stereo distribution matrix (2 rows × 8 columns).
pub const OUTPUT_DISTRIBUTION: Mat<STEREO_CHANNELS, NETWORK_CHANNELS> = Mat::from_rows([
    [-0.05, -0.207, 0.18, -0.172, -0.221, -0.287, 0.077, -0.095],
    [-0.252, 0.29, -0.163, 0.064, -0.272, -0.135, 0.211, 0.085],
]);

/// Raw modal basis for the feedback matrix.
///
/// Columns are orthonormalized at construction time; what ships here
/// only has to be full rank. See
/// [`modal_feedback_matrix`](crate::modal_feedback_matrix).
pub const MODE_VECTORS: Mat<NETWORK_CHANNELS, NETWORK_CHANNELS> = Mat::from_rows([
    [-2.542, 1.19, -0.103, 0.196, 0.196, 1.07, 0.887, 1.075],
    [-0.028, 0.419, 1.299, 0.278, 0.491, 0.581, -0.374, 0.853],
    [-0.063, 0.12, -0.059, 0.684, -0.031, -0.324, 1.366, -0.432],
    [0.033, -0.3, 1.142, 0.744, -0.226, -0.009, 1.475, 0.95],
    [0.227, 1.462, 0.207, 0.989, 0.501, 1.215, -0.215, 0.865],
    [1.013, 0.531, 1.078, 0.448, 1.018, 1.347, 0.887, 0.302],
    [1.458, 1.034, 0.902, 0.084, 0.795, 0.07, -0.245, -0.182],
    [1.368, -0.102, 0.352, 0.417, 0.284, 1.093, 0.267, 0.046],
]);

/// Per-mode decay gains. Every entry must satisfy `|gain| < 1`.
pub const MODE_GAINS: [f32; NETWORK_CHANNELS] =
    [0.912, 0.812, 0.812, 0.816, 0.921, 0.91, 0.918, 0.919];

/// Default diffuser reflection coefficient.
pub const DIFFUSION_REFLECTION: f32 = 0.3;

/// Default diffuser pole angle in radians.
pub const DIFFUSION_ANGLE: f32 = 0.3;

/// A complete parameterization of the reverberator.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    /// Per-channel lags of the stereo input delay.
    pub input_lags: [usize; STEREO_CHANNELS],
    /// Lags of the feedback delay bank.
    pub feedback_lags: [usize; NETWORK_CHANNELS],
    /// Stereo → network distribution.
    pub input_distribution: Mat<NETWORK_CHANNELS, STEREO_CHANNELS>,
    /// Network → stereo distribution.
    pub output_distribution: Mat<STEREO_CHANNELS, NETWORK_CHANNELS>,
    /// Modal basis for the feedback matrix.
    pub mode_vectors: Mat<NETWORK_CHANNELS, NETWORK_CHANNELS>,
    /// Per-mode decay gains, each strictly inside the unit circle.
    pub mode_gains: [f32; NETWORK_CHANNELS],
    /// Diffuser reflection coefficient.
    pub reflection: f32,
    /// Diffuser pole angle in radians.
    pub angle: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            input_lags: INPUT_LAGS,
            feedback_lags: FEEDBACK_LAGS,
            input_distribution: INPUT_DISTRIBUTION,
            output_distribution: OUTPUT_DISTRIBUTION,
            mode_vectors: MODE_VECTORS,
            mode_gains: MODE_GAINS,
            reflection: DIFFUSION_REFLECTION,
            angle: DIFFUSION_ANGLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_gains_are_contractive() {
        for (i, gain) in MODE_GAINS.iter().enumerate() {
            assert!(gain.abs() < 1.0, "mode {i} gain {gain} escapes the unit circle");
        }
    }

    #[test]
    fn test_shipped_basis_is_full_rank() {
        let q = MODE_VECTORS
            .orthonormalized_columns()
            .expect("shipped modal basis must be full rank");
        let gram = q.transpose().matmul(&q);
        for i in 0..NETWORK_CHANNELS {
            for j in 0..NETWORK_CHANNELS {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram.get(i, j) - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_feedback_lags_are_pairwise_distinct() {
        for i in 0..NETWORK_CHANNELS {
            for j in (i + 1)..NETWORK_CHANNELS {
                assert_ne!(
                    FEEDBACK_LAGS[i], FEEDBACK_LAGS[j],
                    "duplicate loop lags re-align echoes"
                );
            }
        }
    }

    #[test]
    fn test_default_tuning_uses_shipped_tables() {
        let tuning = Tuning::default();
        assert_eq!(tuning.input_lags, INPUT_LAGS);
        assert_eq!(tuning.feedback_lags, FEEDBACK_LAGS);
        assert_eq!(tuning.mode_gains, MODE_GAINS);
    }
}
