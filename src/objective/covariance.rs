//! Covariance matrices and the synthetic covariance heuristic.

use crate::error::{PortfolioError, Result};

const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// Square, symmetric `n x n` matrix stored row-major.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovarianceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl CovarianceMatrix {
    /// Builds a matrix from rows.
    ///
    /// # Errors
    ///
    /// - [`PortfolioError::Dimension`] if any row length differs from the row count.
    /// - [`PortfolioError::Domain`] if an entry is not finite or the matrix
    ///   is not symmetric.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(PortfolioError::dimension(n, row.len(), "covariance row"));
            }
            data.extend(row);
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(PortfolioError::Domain(format!(
                "covariance entry is not finite ({bad})"
            )));
        }

        let matrix = Self { n, data };
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (matrix.get(i, j), matrix.get(j, i));
                if (a - b).abs() > SYMMETRY_TOLERANCE * a.abs().max(b.abs()).max(1.0) {
                    return Err(PortfolioError::Domain(format!(
                        "covariance is not symmetric at ({i}, {j}): {a} != {b}"
                    )));
                }
            }
        }
        Ok(matrix)
    }

    /// Number of assets.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entry at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range");
        self.data[i * self.n + j]
    }

    /// Row `i` as a slice.
    ///
    /// # Panics
    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n, "row {i} out of range");
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Derives a covariance matrix from percentage returns alone.
///
/// This is a heuristic stand-in, not a statistical estimate from price
/// history:
///
/// - diagonal: `(r_i / 100)^2`
/// - off-diagonal: `0.5 * r_i * r_j / 10000`
///
/// The result equals `0.5 * (q q^T + diag(q)^2)` with `q = r / 100`, so it
/// is always positive semi-definite.
///
/// # Examples
///
/// ```
/// use u_portfolio::objective::build_synthetic_covariance;
///
/// let cov = build_synthetic_covariance(&[10.0, 20.0]);
/// assert!((cov.get(0, 0) - 0.01).abs() < 1e-15);
/// assert!((cov.get(0, 1) - 0.01).abs() < 1e-15);
/// assert!((cov.get(1, 1) - 0.04).abs() < 1e-15);
/// ```
pub fn build_synthetic_covariance(returns: &[f64]) -> CovarianceMatrix {
    let n = returns.len();
    let mut data = Vec::with_capacity(n * n);
    for (i, ri) in returns.iter().enumerate() {
        for (j, rj) in returns.iter().enumerate() {
            let v = if i == j {
                (ri / 100.0).powi(2)
            } else {
                0.5 * ri * rj / 10000.0
            };
            data.push(v);
        }
    }
    CovarianceMatrix { n, data }
}
