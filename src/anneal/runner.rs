//! Annealing execution loop.

use super::acceptance::Anchors;
use super::config::{AnnealConfig, CoolingCadence};
use super::neighbor::NeighborGenerator;
use crate::error::{PortfolioError, Result};
use crate::objective::{Evaluation, Objective};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, info_span, warn};

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// Best weights found, each rounded to 4 decimal places.
    pub weights: Vec<f64>,

    /// Best weights at full precision.
    pub exact_weights: Vec<f64>,

    /// Return and risk of `exact_weights`.
    pub best: Evaluation,

    /// The optimized scalar of `best` (return or risk).
    pub best_objective: f64,

    /// Starting weights of the first restart.
    pub initial_weights: Vec<f64>,

    /// Return and risk of `initial_weights`.
    pub initial: Evaluation,

    /// Total steps executed across all restarts.
    pub iterations: usize,

    /// Number of restarts executed.
    pub restarts: usize,

    /// Temperature when the run stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of moves that beat the reference outright.
    pub improving_moves: usize,

    /// Steps skipped because every perturbation clamped to zero.
    pub degenerate_proposals: usize,

    /// Whether `best` satisfies the acceptance rule's constraint.
    pub feasible: bool,

    /// Best objective sampled every `history_interval` steps.
    pub cost_history: Vec<f64>,
}

/// Executes portfolio annealing runs.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs one optimization, seeding from `config.seed` (or entropy when unset).
    pub fn run<O: Objective>(objective: &O, config: &AnnealConfig) -> Result<AnnealResult> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Self::run_with_rng(objective, config, &mut rng)
    }

    /// Runs one optimization drawing every random number from `rng`.
    ///
    /// `config.seed` is ignored.
    ///
    /// # Errors
    ///
    /// Configuration and dimension errors are reported before the first
    /// step. Evaluation errors (e.g. [`PortfolioError::Domain`]) abort the
    /// run. Degenerate proposals never do: the step is skipped and counted.
    pub fn run_with_rng<O: Objective, R: Rng>(
        objective: &O,
        config: &AnnealConfig,
        rng: &mut R,
    ) -> Result<AnnealResult> {
        config.validate()?;
        let n = objective.num_assets();
        if n == 0 {
            return Err(PortfolioError::InvalidConfig(
                "objective has no assets".into(),
            ));
        }

        let acceptance = &config.acceptance;
        let span = info_span!("anneal", acceptance = acceptance.label(), assets = n);
        let _guard = span.enter();

        let generator = NeighborGenerator::new(
            config.perturbation_bound,
            config.projection,
            config.max_perturb_attempts,
        );

        // Init
        let initial_weights = config
            .initial_weights
            .draw(n, config.max_perturb_attempts, rng)?;
        let initial = objective.evaluate(&initial_weights)?;
        let mut best_weights = initial_weights.clone();
        let mut best = initial;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut degenerate_proposals = 0usize;

        let mut cost_history = vec![acceptance.objective_value(&best)];

        for restart in 0..config.restarts {
            let (mut current_weights, mut current) = if restart == 0 {
                (initial_weights.clone(), initial)
            } else {
                let weights = config
                    .initial_weights
                    .draw(n, config.max_perturb_attempts, rng)?;
                let eval = objective.evaluate(&weights)?;
                (weights, eval)
            };
            let anchor = current;
            debug!(
                restart,
                temperature,
                start = acceptance.objective_value(&anchor),
                best = acceptance.objective_value(&best),
                "restart"
            );

            // Iterate
            for _ in 0..config.iterations {
                total_iterations += 1;

                match generator.propose(&current_weights, rng) {
                    Ok(candidate_weights) => {
                        let candidate = objective.evaluate(&candidate_weights)?;
                        let anchors = Anchors {
                            initial: anchor,
                            current,
                            best,
                        };
                        let decision = acceptance.decide(&candidate, &anchors, temperature, rng);
                        if decision.improving {
                            improving_moves += 1;
                        }
                        if decision.accepted {
                            accepted_moves += 1;
                            if acceptance.improves(&candidate, &best) {
                                best = candidate;
                                best_weights.clone_from(&candidate_weights);
                            }
                            current_weights = candidate_weights;
                            current = candidate;
                        }
                    }
                    Err(PortfolioError::DegenerateNormalization { attempts }) => {
                        degenerate_proposals += 1;
                        debug!(attempts, step = total_iterations, "skipped degenerate proposal");
                    }
                    Err(e) => return Err(e),
                }

                if total_iterations.is_multiple_of(config.history_interval) {
                    cost_history.push(acceptance.objective_value(&best));
                }

                if config.cadence == CoolingCadence::PerStep {
                    temperature = config.cooling.apply(temperature);
                }
            }

            if config.cadence == CoolingCadence::PerRestart {
                temperature = config.cooling.apply(temperature);
            }
        }

        // Terminal
        let best_objective = acceptance.objective_value(&best);
        if cost_history
            .last()
            .is_none_or(|&last| (last - best_objective).abs() > 1e-15)
        {
            cost_history.push(best_objective);
        }

        let feasible = acceptance.is_feasible(&best);
        if !feasible {
            warn!(
                best_return = best.portfolio_return,
                "no candidate met the return floor; reporting the initial state"
            );
        }
        info!(
            best_return = best.portfolio_return,
            best_risk = best.risk,
            iterations = total_iterations,
            accepted_moves,
            improving_moves,
            degenerate_proposals,
            final_temperature = temperature,
            "annealing finished"
        );

        Ok(AnnealResult {
            weights: best_weights.iter().map(|&w| round4(w)).collect(),
            exact_weights: best_weights,
            best,
            best_objective,
            initial_weights,
            initial,
            iterations: total_iterations,
            restarts: config.restarts,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            degenerate_proposals,
            feasible,
            cost_history,
        })
    }

    /// Runs several independent optimizations over the same objective.
    ///
    /// Each run owns its RNG (seeded from its own config) and state. With
    /// the `parallel` feature the runs execute on the rayon pool.
    pub fn run_many<O: Objective>(
        objective: &O,
        configs: &[AnnealConfig],
    ) -> Vec<Result<AnnealResult>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            configs
                .par_iter()
                .map(|config| Self::run(objective, config))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            configs
                .iter()
                .map(|config| Self::run(objective, config))
                .collect()
        }
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
