//! Portfolio objective functions.
//!
//! Pure numeric evaluators over a weight vector:
//!
//! - linear return `w . r`
//! - quadratic-form risk `sqrt(w^T C w)` against a covariance matrix
//! - independent-contributor risk `sqrt(sum (w_i s_i)^2)`
//!
//! [`PortfolioModel`] binds one return vector to one [`RiskModel`] and
//! implements [`Objective`], the seam through which the annealing loop
//! evaluates candidates.

mod covariance;
mod functions;
mod types;

pub use covariance::{build_synthetic_covariance, CovarianceMatrix};
pub use functions::{portfolio_return, portfolio_risk, portfolio_risk_weighted};
pub use types::{Evaluation, Objective, PortfolioModel, RiskModel};
