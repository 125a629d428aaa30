//! Error types for portfolio annealing.

use thiserror::Error;

/// Error type for every fallible operation in the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Input vectors or matrices disagree on the number of assets.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    Dimension {
        expected: usize,
        got: usize,
        context: &'static str,
    },

    /// A numeric evaluation left its domain (negative radicand, NaN, ...).
    #[error("Domain error: {0}")]
    Domain(String),

    /// Every perturbed weight clamped to zero, so there is nothing to normalize by.
    #[error("Degenerate normalization: all weights clamped to zero after {attempts} attempt(s)")]
    DegenerateNormalization { attempts: usize },

    /// Configuration rejected before any work was done.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A weight vector is not on the probability simplex.
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    /// Too few observations to compute a statistic.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl PortfolioError {
    pub(crate) fn dimension(expected: usize, got: usize, context: &'static str) -> Self {
        PortfolioError::Dimension {
            expected,
            got,
            context,
        }
    }
}

/// Result type for portfolio operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;
