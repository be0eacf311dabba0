//! Fixed-size matrices for channel distribution and modal mixing.
//!
//! The network needs exactly four operations at compile-time-known
//! dimensions: construct from explicit coefficients, multiply a frame,
//! transpose, and multiply two matrices (plus diagonal construction for
//! the modal decay gains). [`Mat`] provides those and nothing more; the
//! const-generic dimensions turn any shape mismatch between matrices into
//! a compile error instead of a runtime check.

use libm::sqrtf;

use crate::frame::Frame;

/// A fixed-size row-major `f32` matrix with `R` rows and `C` columns.
///
/// Coefficients are immutable after construction; all operations return
/// new values.
///
/// # Example
///
/// ```rust
/// use resona_core::{Frame, Mat};
///
/// let spread = Mat::from_rows([[1.0, 0.0], [0.0, 1.0], [0.5, 0.5]]);
/// let out = spread.mul_frame(&Frame::stereo(0.2, 0.6));
/// assert_eq!(out.as_slice(), &[0.2, 0.6, 0.4]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat<const R: usize, const C: usize> {
    rows: [[f32; C]; R],
}

impl<const R: usize, const C: usize> Mat<R, C> {
    /// Construct from explicit row-major coefficients.
    pub const fn from_rows(rows: [[f32; C]; R]) -> Self {
        Self { rows }
    }

    /// The coefficient at the given row and column.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    /// Matrix-vector multiply over a frame.
    ///
    /// # Panics
    ///
    /// Panics if the frame's channel count differs from the column count;
    /// a dimension mismatch is a wiring error, never padded or truncated.
    pub fn mul_frame(&self, input: &Frame) -> Frame {
        assert_eq!(
            input.channels(),
            C,
            "matrix with {} columns fed a {}-channel frame",
            C,
            input.channels()
        );
        let mut output = Frame::silent(R);
        for (i, row) in self.rows.iter().enumerate() {
            let mut acc = 0.0;
            for (j, coefficient) in row.iter().enumerate() {
                acc += coefficient * input[j];
            }
            output[i] = acc;
        }
        output
    }

    /// The transposed matrix.
    pub fn transpose(&self) -> Mat<C, R> {
        let mut rows = [[0.0; R]; C];
        for i in 0..R {
            for j in 0..C {
                rows[j][i] = self.rows[i][j];
            }
        }
        Mat { rows }
    }

    /// Matrix-matrix product `self · rhs`.
    pub fn matmul<const K: usize>(&self, rhs: &Mat<C, K>) -> Mat<R, K> {
        let mut rows = [[0.0; K]; R];
        for i in 0..R {
            for j in 0..K {
                let mut acc = 0.0;
                for t in 0..C {
                    acc += self.rows[i][t] * rhs.rows[t][j];
                }
                rows[i][j] = acc;
            }
        }
        Mat { rows }
    }
}

impl<const N: usize> Mat<N, N> {
    /// A diagonal matrix from the given gains.
    pub fn diag(gains: [f32; N]) -> Self {
        let mut rows = [[0.0; N]; N];
        for (i, gain) in gains.into_iter().enumerate() {
            rows[i][i] = gain;
        }
        Self { rows }
    }

    /// Orthonormalize the columns by modified Gram-Schmidt.
    ///
    /// Returns the matrix whose columns span the same spaces as this
    /// one's leading columns but are mutually orthogonal with unit norm,
    /// or `None` if the columns are linearly dependent (a residual
    /// collapses below working precision).
    ///
    /// The modal feedback construction relies on this: with an
    /// orthonormal basis `Q`, the mixing matrix `Q·diag(λ)·Qᵀ` has
    /// spectral norm `max|λᵢ|`, so gains inside the unit circle make the
    /// closed loop a strict contraction.
    pub fn orthonormalized_columns(&self) -> Option<Self> {
        let mut cols = [[0.0f32; N]; N];
        for i in 0..N {
            for j in 0..N {
                cols[j][i] = self.rows[i][j];
            }
        }

        for j in 0..N {
            for k in 0..j {
                let mut dot = 0.0;
                for i in 0..N {
                    dot += cols[j][i] * cols[k][i];
                }
                for i in 0..N {
                    cols[j][i] -= dot * cols[k][i];
                }
            }
            let mut norm_sq = 0.0;
            for value in &cols[j] {
                norm_sq += value * value;
            }
            let norm = sqrtf(norm_sq);
            if norm < 1e-6 {
                return None;
            }
            for value in &mut cols[j] {
                *value /= norm;
            }
        }

        let mut rows = [[0.0; N]; N];
        for i in 0..N {
            for j in 0..N {
                rows[i][j] = cols[j][i];
            }
        }
        Some(Self { rows })
    }
}
