//! Portfolio return and risk evaluators.

use super::covariance::CovarianceMatrix;
use crate::error::{PortfolioError, Result};

/// Radicands in `[-NEGATIVE_RADICAND_TOLERANCE, 0)` are rounding noise and
/// are treated as zero.
const NEGATIVE_RADICAND_TOLERANCE: f64 = 1e-12;

/// Linear portfolio return: `sum_i w_i * r_i`.
///
/// # Errors
///
/// [`PortfolioError::Dimension`] if `weights` and `returns` differ in length.
///
/// # Examples
///
/// ```
/// use u_portfolio::objective::portfolio_return;
///
/// let r = portfolio_return(&[0.25, 0.75], &[10.0, 20.0]).unwrap();
/// assert!((r - 17.5).abs() < 1e-12);
/// ```
pub fn portfolio_return(weights: &[f64], returns: &[f64]) -> Result<f64> {
    if weights.len() != returns.len() {
        return Err(PortfolioError::dimension(
            returns.len(),
            weights.len(),
            "portfolio_return",
        ));
    }
    Ok(weights.iter().zip(returns).map(|(w, r)| w * r).sum())
}

/// Quadratic-form risk: `sqrt(sum_i sum_j w_i * w_j * cov_ij)`.
///
/// # Errors
///
/// - [`PortfolioError::Dimension`] if the weight count differs from the
///   matrix dimension.
/// - [`PortfolioError::Domain`] if the radicand is negative (covariance not
///   positive semi-definite) or not finite.
pub fn portfolio_risk(weights: &[f64], covariance: &CovarianceMatrix) -> Result<f64> {
    let n = covariance.dim();
    if weights.len() != n {
        return Err(PortfolioError::dimension(n, weights.len(), "portfolio_risk"));
    }

    let mut variance = 0.0;
    for (i, wi) in weights.iter().enumerate() {
        for (j, wj) in weights.iter().enumerate() {
            variance += wi * wj * covariance.get(i, j);
        }
    }
    checked_sqrt(variance, "portfolio variance")
}

/// Independent-contributor risk proxy: `sqrt(sum_i (w_i * s_i)^2)`.
///
/// Ignores co-movement entirely; `risks` holds per-asset standard deviations.
///
/// # Errors
///
/// - [`PortfolioError::Dimension`] if `weights` and `risks` differ in length.
/// - [`PortfolioError::Domain`] if the result is not finite.
pub fn portfolio_risk_weighted(weights: &[f64], risks: &[f64]) -> Result<f64> {
    if weights.len() != risks.len() {
        return Err(PortfolioError::dimension(
            risks.len(),
            weights.len(),
            "portfolio_risk_weighted",
        ));
    }
    let sum_sq: f64 = weights
        .iter()
        .zip(risks)
        .map(|(w, s)| {
            let c = w * s;
            c * c
        })
        .sum();
    checked_sqrt(sum_sq, "weighted risk")
}

fn checked_sqrt(radicand: f64, what: &str) -> Result<f64> {
    if !radicand.is_finite() {
        return Err(PortfolioError::Domain(format!(
            "{what} is not finite ({radicand})"
        )));
    }
    if radicand < -NEGATIVE_RADICAND_TOLERANCE {
        return Err(PortfolioError::Domain(format!(
            "{what} is negative ({radicand}); covariance is not positive semi-definite"
        )));
    }
    Ok(radicand.max(0.0).sqrt())
}
