//! Annealing configuration, cooling schedule, and strategy presets.

use super::acceptance::{Acceptance, ReferencePoint};
use super::neighbor::SimplexProjection;
use crate::error::{PortfolioError, Result};
use rand::Rng;

/// Default number of steps per restart.
pub const DEFAULT_ITERATIONS: usize = 1000;
/// Default starting temperature.
pub const DEFAULT_INITIAL_TEMPERATURE: f64 = 1000.0;
/// Default geometric cooling rate.
pub const DEFAULT_COOLING_RATE: f64 = 0.003;
/// Default return floor for [`AnnealConfig::min_risk_with_floor`].
pub const DEFAULT_TARGET_RETURN: f64 = 15.0;

/// Tolerance for a caller-supplied weight vector to count as summing to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Geometric cooling: `T_{k+1} = (1 - rate) * T_k`.
///
/// No floor is applied; the temperature approaches zero but a `rate` in
/// `[0, 1)` keeps it positive until it underflows.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooling {
    /// Fraction of the temperature removed per application, in `[0, 1)`.
    /// `0` keeps the temperature constant.
    pub rate: f64,
}

impl Default for Cooling {
    fn default() -> Self {
        Self {
            rate: DEFAULT_COOLING_RATE,
        }
    }
}

impl Cooling {
    pub fn apply(&self, temperature: f64) -> f64 {
        temperature * (1.0 - self.rate)
    }
}

/// When the cooling schedule is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingCadence {
    /// After every step.
    PerStep,
    /// After every restart (all steps of one restart share a temperature).
    PerRestart,
}

/// How a restart's starting weights are chosen.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialWeights {
    /// `1 / n` per asset.
    Equal,
    /// Independent `uniform(0, 1)` per asset, normalized.
    Random,
    /// Caller-supplied weights; must lie on the simplex.
    Given(Vec<f64>),
}

impl InitialWeights {
    /// Produces a starting weight vector for `n` assets.
    ///
    /// # Errors
    ///
    /// - For `Random`: [`PortfolioError::DegenerateNormalization`] if all
    ///   `max_attempts` draws came out as the zero vector.
    /// - For `Given`: [`PortfolioError::Dimension`] on a length mismatch,
    ///   [`PortfolioError::InvalidWeights`] if an entry is negative or not
    ///   finite, or the entries do not sum to one.
    pub fn draw<R: Rng>(&self, n: usize, max_attempts: usize, rng: &mut R) -> Result<Vec<f64>> {
        match self {
            InitialWeights::Equal => Ok(vec![1.0 / n as f64; n]),
            InitialWeights::Random => {
                for _ in 0..max_attempts {
                    let raw: Vec<f64> = (0..n).map(|_| rng.random_range(0.0..1.0)).collect();
                    let total: f64 = raw.iter().sum();
                    if total > 0.0 {
                        return Ok(raw.into_iter().map(|w| w / total).collect());
                    }
                }
                Err(PortfolioError::DegenerateNormalization {
                    attempts: max_attempts,
                })
            }
            InitialWeights::Given(weights) => {
                if weights.len() != n {
                    return Err(PortfolioError::dimension(n, weights.len(), "initial weights"));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(PortfolioError::InvalidWeights(
                        "initial weights must be finite and non-negative".into(),
                    ));
                }
                let total: f64 = weights.iter().sum();
                if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                    return Err(PortfolioError::InvalidWeights(format!(
                        "initial weights must sum to 1, got {total}"
                    )));
                }
                Ok(weights.clone())
            }
        }
    }
}

/// Configuration for one annealing run.
///
/// Start from a preset and adjust:
///
/// ```
/// use u_portfolio::anneal::AnnealConfig;
///
/// let config = AnnealConfig::min_risk()
///     .with_restarts(50)
///     .with_iterations(50)
///     .with_cooling_rate(0.01)
///     .with_initial_temperature(100.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Acceptance rule (and therefore the optimization goal).
    pub acceptance: Acceptance,

    /// Starting temperature. Must be positive.
    pub initial_temperature: f64,

    /// Cooling schedule.
    pub cooling: Cooling,

    /// Whether cooling happens per step or per restart.
    pub cadence: CoolingCadence,

    /// Steps (neighbor evaluations) per restart. `0` returns the initial
    /// state unperturbed.
    pub iterations: usize,

    /// Number of restarts. Total work is `restarts * iterations`.
    pub restarts: usize,

    /// Half-width of the uniform per-asset perturbation.
    pub perturbation_bound: f64,

    /// How perturbed vectors are mapped back onto the simplex.
    pub projection: SimplexProjection,

    /// Fresh perturbations tried before a step is skipped as degenerate.
    pub max_perturb_attempts: usize,

    /// Starting weights for each restart.
    pub initial_weights: InitialWeights,

    /// Record the best objective every this many steps.
    pub history_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self::max_return()
    }
}

impl AnnealConfig {
    /// Return maximization from equal (or given) starting weights.
    ///
    /// Deltas are measured against the run's initial return, bound 0.01,
    /// cooling after every step.
    pub fn max_return() -> Self {
        Self {
            acceptance: Acceptance::MaximizeReturn {
                reference: ReferencePoint::Initial,
            },
            initial_temperature: DEFAULT_INITIAL_TEMPERATURE,
            cooling: Cooling::default(),
            cadence: CoolingCadence::PerStep,
            iterations: DEFAULT_ITERATIONS,
            restarts: 1,
            perturbation_bound: 0.01,
            projection: SimplexProjection::default(),
            max_perturb_attempts: 16,
            initial_weights: InitialWeights::Equal,
            history_interval: 100,
            seed: None,
        }
    }

    /// Unconstrained risk minimization with random restarts.
    ///
    /// Deltas are measured against the best risk found so far, bound 0.02,
    /// cooling once per restart. The default `restarts == iterations`
    /// makes the cost quadratic in the iteration count.
    pub fn min_risk() -> Self {
        Self {
            acceptance: Acceptance::MinimizeRisk {
                reference: ReferencePoint::Best,
            },
            cadence: CoolingCadence::PerRestart,
            restarts: DEFAULT_ITERATIONS,
            perturbation_bound: 0.02,
            initial_weights: InitialWeights::Random,
            ..Self::max_return()
        }
    }

    /// Risk minimization subject to `return >= target_return`, from a
    /// random start, bound 0.02. The temperature is still cooled but never
    /// consulted.
    pub fn min_risk_with_floor(target_return: f64) -> Self {
        Self {
            acceptance: Acceptance::ReturnFloor { target_return },
            perturbation_bound: 0.02,
            initial_weights: InitialWeights::Random,
            ..Self::max_return()
        }
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling = Cooling { rate };
        self
    }

    pub fn with_cadence(mut self, cadence: CoolingCadence) -> Self {
        self.cadence = cadence;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_perturbation_bound(mut self, bound: f64) -> Self {
        self.perturbation_bound = bound;
        self
    }

    pub fn with_projection(mut self, projection: SimplexProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_max_perturb_attempts(mut self, n: usize) -> Self {
        self.max_perturb_attempts = n;
        self
    }

    /// Starts every restart from `weights`.
    pub fn with_initial_weights(mut self, weights: Vec<f64>) -> Self {
        self.initial_weights = InitialWeights::Given(weights);
        self
    }

    pub fn with_start(mut self, start: InitialWeights) -> Self {
        self.initial_weights = start;
        self
    }

    /// Sets the delta reference for the randomized rules.
    ///
    /// Has no effect on [`Acceptance::ReturnFloor`].
    pub fn with_reference(mut self, reference: ReferencePoint) -> Self {
        match &mut self.acceptance {
            Acceptance::MaximizeReturn { reference: r } | Acceptance::MinimizeRisk { reference: r } => {
                *r = reference;
            }
            Acceptance::ReturnFloor { .. } => {}
        }
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Initial weights are checked against the asset count when the run
    /// starts.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(PortfolioError::InvalidConfig(format!(
                "initial_temperature must be positive and finite, got {}",
                self.initial_temperature
            )));
        }
        let rate = self.cooling.rate;
        if !(0.0..1.0).contains(&rate) {
            return Err(PortfolioError::InvalidConfig(format!(
                "cooling rate must be in [0, 1), got {rate}"
            )));
        }
        if self.restarts == 0 {
            return Err(PortfolioError::InvalidConfig(
                "restarts must be at least 1".into(),
            ));
        }
        if !(self.perturbation_bound.is_finite() && self.perturbation_bound > 0.0) {
            return Err(PortfolioError::InvalidConfig(format!(
                "perturbation_bound must be positive and finite, got {}",
                self.perturbation_bound
            )));
        }
        if self.max_perturb_attempts == 0 {
            return Err(PortfolioError::InvalidConfig(
                "max_perturb_attempts must be at least 1".into(),
            ));
        }
        if self.history_interval == 0 {
            return Err(PortfolioError::InvalidConfig(
                "history_interval must be at least 1".into(),
            ));
        }
        if let Acceptance::ReturnFloor { target_return } = self.acceptance {
            if !target_return.is_finite() {
                return Err(PortfolioError::InvalidConfig(format!(
                    "target_return must be finite, got {target_return}"
                )));
            }
        }
        Ok(())
    }
}
