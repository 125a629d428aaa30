//! Portfolio weight search by simulated annealing.
//!
//! Searches the probability simplex (non-negative weights summing to one)
//! for allocations that optimize a numeric objective, instead of solving
//! the mean-variance problem in closed form:
//!
//! - **Objective** ([`objective`]): linear return, quadratic-form risk
//!   against a covariance matrix, and an independent-contributor risk
//!   proxy; a synthetic covariance heuristic for when no covariance is
//!   supplied.
//! - **Annealing** ([`anneal`]): one optimizer loop with pluggable
//!   acceptance rules for return maximization, risk minimization, and
//!   risk minimization under a return floor; seedable randomness;
//!   pluggable simplex projection.
//! - **Statistics** ([`stats`]): annualized return and risk from closing
//!   prices, per calendar year.
//!
//! # Example
//!
//! ```
//! use u_portfolio::anneal::{AnnealConfig, AnnealRunner};
//! use u_portfolio::objective::PortfolioModel;
//!
//! let model = PortfolioModel::synthetic(vec![10.0, 20.0]).unwrap();
//! let config = AnnealConfig::min_risk()
//!     .with_restarts(50)
//!     .with_iterations(50)
//!     .with_cooling_rate(0.01)
//!     .with_initial_temperature(100.0)
//!     .with_seed(42);
//! let result = AnnealRunner::run(&model, &config).unwrap();
//! assert_eq!(result.weights.len(), 2);
//! assert!(result.best.risk <= result.initial.risk);
//! ```

pub mod anneal;
pub mod error;
pub mod objective;
pub mod stats;

pub use error::{PortfolioError, Result};
