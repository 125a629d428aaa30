//! Simulated annealing over portfolio weights.
//!
//! One loop, parameterized by an [`Objective`](crate::objective::Objective)
//! and an [`Acceptance`] rule:
//!
//! 1. **Init**: validate, draw starting weights, evaluate
//! 2. **Iterate**: propose a neighbor on the simplex, evaluate, accept or
//!    reject, update best, cool
//! 3. **Terminal**: report the best weights rounded to 4 decimal places
//!
//! There is no convergence test; every run spends its full
//! `restarts * iterations` budget.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod acceptance;
mod config;
mod neighbor;
mod runner;

pub use acceptance::{Acceptance, Anchors, Decision, ReferencePoint};
pub use config::{
    AnnealConfig, Cooling, CoolingCadence, InitialWeights, DEFAULT_COOLING_RATE,
    DEFAULT_INITIAL_TEMPERATURE, DEFAULT_ITERATIONS, DEFAULT_TARGET_RETURN,
};
pub use neighbor::{NeighborGenerator, SimplexProjection};
pub use runner::{AnnealResult, AnnealRunner};
