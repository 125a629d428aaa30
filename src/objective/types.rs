//! Objective trait and the portfolio model that implements it.

use super::covariance::{build_synthetic_covariance, CovarianceMatrix};
use super::functions::{portfolio_return, portfolio_risk, portfolio_risk_weighted};
use crate::error::{PortfolioError, Result};

/// Return and risk of one weight vector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    /// Linear portfolio return, in the units of the return vector.
    pub portfolio_return: f64,
    /// Portfolio risk under the model's risk formula.
    pub risk: f64,
}

/// How portfolio risk is measured.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskModel {
    /// Quadratic form against a covariance matrix.
    Covariance(CovarianceMatrix),
    /// Per-asset standard deviations treated as independent contributors.
    Independent(Vec<f64>),
}

impl RiskModel {
    fn dim(&self) -> usize {
        match self {
            RiskModel::Covariance(cov) => cov.dim(),
            RiskModel::Independent(risks) => risks.len(),
        }
    }

    /// Risk of `weights` under this model.
    pub fn risk(&self, weights: &[f64]) -> Result<f64> {
        match self {
            RiskModel::Covariance(cov) => portfolio_risk(weights, cov),
            RiskModel::Independent(risks) => portfolio_risk_weighted(weights, risks),
        }
    }
}

/// Evaluates weight vectors for the optimizer loop.
///
/// Implementations must be pure: the same weights always produce the same
/// evaluation.
pub trait Objective: Send + Sync {
    /// Number of assets the objective expects.
    fn num_assets(&self) -> usize;

    /// Computes return and risk of `weights`.
    fn evaluate(&self, weights: &[f64]) -> Result<Evaluation>;
}

/// Immutable per-run inputs: returns plus a risk model.
///
/// Dimensions are checked on construction, so a run fails before its first
/// iteration rather than midway.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioModel {
    returns: Vec<f64>,
    risk_model: RiskModel,
}

impl PortfolioModel {
    /// Pairs returns with a supplied covariance matrix.
    pub fn with_covariance(returns: Vec<f64>, covariance: CovarianceMatrix) -> Result<Self> {
        Self::new(returns, RiskModel::Covariance(covariance))
    }

    /// Pairs returns with the synthetic covariance built from them.
    ///
    /// See [`build_synthetic_covariance`] for the heuristic.
    pub fn synthetic(returns: Vec<f64>) -> Result<Self> {
        let covariance = build_synthetic_covariance(&returns);
        Self::new(returns, RiskModel::Covariance(covariance))
    }

    /// Pairs returns with independent per-asset risks.
    pub fn with_risks(returns: Vec<f64>, risks: Vec<f64>) -> Result<Self> {
        Self::new(returns, RiskModel::Independent(risks))
    }

    /// Validates and binds the inputs.
    ///
    /// # Errors
    ///
    /// - [`PortfolioError::InvalidConfig`] for an empty asset set.
    /// - [`PortfolioError::Dimension`] if the risk model size differs from
    ///   the number of returns.
    /// - [`PortfolioError::Domain`] for non-finite returns or risks.
    pub fn new(returns: Vec<f64>, risk_model: RiskModel) -> Result<Self> {
        if returns.is_empty() {
            return Err(PortfolioError::InvalidConfig(
                "at least one asset is required".into(),
            ));
        }
        if risk_model.dim() != returns.len() {
            return Err(PortfolioError::dimension(
                returns.len(),
                risk_model.dim(),
                "risk model",
            ));
        }
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(PortfolioError::Domain("returns must be finite".into()));
        }
        if let RiskModel::Independent(risks) = &risk_model {
            if risks.iter().any(|s| !s.is_finite()) {
                return Err(PortfolioError::Domain("risks must be finite".into()));
            }
        }
        Ok(Self {
            returns,
            risk_model,
        })
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn risk_model(&self) -> &RiskModel {
        &self.risk_model
    }
}

impl Objective for PortfolioModel {
    fn num_assets(&self) -> usize {
        self.returns.len()
    }

    fn evaluate(&self, weights: &[f64]) -> Result<Evaluation> {
        Ok(Evaluation {
            portfolio_return: portfolio_return(weights, &self.returns)?,
            risk: self.risk_model.risk(weights)?,
        })
    }
}
