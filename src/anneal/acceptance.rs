//! Acceptance policies.
//!
//! Three Metropolis-style rules that differ in which state the candidate is
//! compared against and in whether randomness is consulted at all.
//!
//! | Rule | Goal | Delta | Randomized |
//! |---|---|---|---|
//! | [`Acceptance::MaximizeReturn`] | max return | `r_cand - r_ref` | `d > 0` or `u < exp(d / T)` |
//! | [`Acceptance::MinimizeRisk`] | min risk | `s_cand - s_ref` | `d < 0` or `u < exp(-d / T)` |
//! | [`Acceptance::ReturnFloor`] | min risk, return >= floor | `r_cand - floor`, `s_cand - s_best` | no |
//!
//! The reference state defaults to the run's initial state for
//! `MaximizeReturn` and to the best state for `MinimizeRisk`;
//! [`ReferencePoint::Current`] selects the textbook criterion.

use crate::objective::Evaluation;
use rand::Rng;

/// Which state a candidate's delta is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReferencePoint {
    /// The starting state of the current restart. Never moves.
    Initial,
    /// The best state found so far.
    Best,
    /// The current state.
    Current,
}

/// States available to an acceptance decision.
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    pub initial: Evaluation,
    pub current: Evaluation,
    pub best: Evaluation,
}

impl Anchors {
    fn pick(&self, reference: ReferencePoint) -> &Evaluation {
        match reference {
            ReferencePoint::Initial => &self.initial,
            ReferencePoint::Best => &self.best,
            ReferencePoint::Current => &self.current,
        }
    }
}

/// Outcome of one acceptance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// The candidate replaces the current state.
    pub accepted: bool,
    /// The candidate was better than the reference (accepted without a draw).
    pub improving: bool,
}

/// Acceptance rule, one variant per optimization goal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Acceptance {
    /// Maximize linear return.
    MaximizeReturn { reference: ReferencePoint },

    /// Minimize risk with no constraint.
    MinimizeRisk { reference: ReferencePoint },

    /// Minimize risk while keeping return at or above `target_return`.
    ///
    /// Deterministic: the temperature is never consulted.
    ReturnFloor { target_return: f64 },
}

impl Acceptance {
    /// Short name used in tracing spans.
    pub fn label(&self) -> &'static str {
        match self {
            Acceptance::MaximizeReturn { .. } => "maximize_return",
            Acceptance::MinimizeRisk { .. } => "minimize_risk",
            Acceptance::ReturnFloor { .. } => "return_floor",
        }
    }

    /// Whether the temperature influences any decision.
    pub fn uses_temperature(&self) -> bool {
        !matches!(self, Acceptance::ReturnFloor { .. })
    }

    /// The scalar being optimized.
    pub fn objective_value(&self, eval: &Evaluation) -> f64 {
        match self {
            Acceptance::MaximizeReturn { .. } => eval.portfolio_return,
            Acceptance::MinimizeRisk { .. } | Acceptance::ReturnFloor { .. } => eval.risk,
        }
    }

    /// Whether `candidate` should replace `best`.
    pub fn improves(&self, candidate: &Evaluation, best: &Evaluation) -> bool {
        match *self {
            Acceptance::MaximizeReturn { .. } => {
                candidate.portfolio_return > best.portfolio_return
            }
            Acceptance::MinimizeRisk { .. } => candidate.risk < best.risk,
            Acceptance::ReturnFloor { target_return } => {
                candidate.portfolio_return >= target_return && candidate.risk < best.risk
            }
        }
    }

    /// Whether `eval` satisfies the rule's hard constraint, if any.
    pub fn is_feasible(&self, eval: &Evaluation) -> bool {
        match *self {
            Acceptance::ReturnFloor { target_return } => eval.portfolio_return >= target_return,
            _ => true,
        }
    }

    /// Decides whether `candidate` replaces the current state.
    ///
    /// A uniform draw is taken from `rng` only when the candidate does not
    /// improve on the reference, and never for `ReturnFloor`.
    pub fn decide<R: Rng>(
        &self,
        candidate: &Evaluation,
        anchors: &Anchors,
        temperature: f64,
        rng: &mut R,
    ) -> Decision {
        match *self {
            Acceptance::MaximizeReturn { reference } => {
                let delta = candidate.portfolio_return - anchors.pick(reference).portfolio_return;
                metropolis(delta, temperature, rng)
            }
            Acceptance::MinimizeRisk { reference } => {
                let delta = candidate.risk - anchors.pick(reference).risk;
                metropolis(-delta, temperature, rng)
            }
            Acceptance::ReturnFloor { target_return } => {
                let return_delta = candidate.portfolio_return - target_return;
                let risk_delta = candidate.risk - anchors.best.risk;
                let accepted = return_delta >= 0.0 && risk_delta < 0.0;
                Decision {
                    accepted,
                    improving: accepted,
                }
            }
        }
    }
}

/// Metropolis test on a gain (positive = better).
fn metropolis<R: Rng>(gain: f64, temperature: f64, rng: &mut R) -> Decision {
    if gain > 0.0 {
        return Decision {
            accepted: true,
            improving: true,
        };
    }
    let accepted = if temperature > 0.0 {
        let probability = (gain / temperature).exp();
        rng.random_range(0.0..1.0) < probability
    } else {
        false
    };
    Decision {
        accepted,
        improving: false,
    }
}
