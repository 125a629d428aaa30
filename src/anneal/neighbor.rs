//! Neighbor generation on the probability simplex.

use crate::error::{PortfolioError, Result};
use rand::Rng;

/// Maps an arbitrary perturbed vector back onto the simplex
/// (non-negative, summing to one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimplexProjection {
    /// Clamp negatives to zero, then divide by the sum.
    ///
    /// Not a true projection: mass removed by clamping is redistributed
    /// proportionally over every asset, including the ones that were just
    /// clamped (which stay at zero) and the ones that were never negative.
    /// Fails when every entry clamps to zero.
    #[default]
    ClampRescale,

    /// Euclidean projection onto the simplex (sort-based, O(n log n)).
    ///
    /// Reference: Duchi, Shalev-Shwartz, Singer & Chandra (2008),
    /// "Efficient Projections onto the l1-Ball for Learning in High Dimensions"
    Euclidean,
}

impl SimplexProjection {
    /// Projects `weights` in place.
    ///
    /// # Errors
    ///
    /// - [`PortfolioError::DegenerateNormalization`] if `ClampRescale` clamps
    ///   every entry to zero.
    /// - [`PortfolioError::Domain`] for non-finite input.
    pub fn project(&self, weights: &mut [f64]) -> Result<()> {
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(PortfolioError::Domain(
                "cannot project non-finite weights".into(),
            ));
        }
        match self {
            SimplexProjection::ClampRescale => clamp_rescale(weights),
            SimplexProjection::Euclidean => {
                euclidean(weights);
                Ok(())
            }
        }
    }
}

fn clamp_rescale(weights: &mut [f64]) -> Result<()> {
    for w in weights.iter_mut() {
        if *w < 0.0 {
            *w = 0.0;
        }
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(PortfolioError::DegenerateNormalization { attempts: 1 });
    }
    for w in weights.iter_mut() {
        *w /= total;
    }
    Ok(())
}

fn euclidean(weights: &mut [f64]) {
    if weights.is_empty() {
        return;
    }
    let mut sorted = weights.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (k, u) in sorted.iter().enumerate() {
        cumulative += u;
        let candidate = (cumulative - 1.0) / (k + 1) as f64;
        if u - candidate > 0.0 {
            theta = candidate;
        }
    }
    for w in weights.iter_mut() {
        *w = (*w - theta).max(0.0);
    }
}

/// Proposes candidate weight vectors by uniform perturbation followed by
/// a [`SimplexProjection`].
#[derive(Debug, Clone)]
pub struct NeighborGenerator {
    bound: f64,
    projection: SimplexProjection,
    max_attempts: usize,
}

impl NeighborGenerator {
    /// Creates a generator.
    ///
    /// `bound` is the half-width of the uniform perturbation, `max_attempts`
    /// the number of fresh perturbations tried before giving up on a
    /// degenerate draw. Both are validated by
    /// [`AnnealConfig::validate`](super::AnnealConfig::validate).
    pub fn new(bound: f64, projection: SimplexProjection, max_attempts: usize) -> Self {
        Self {
            bound,
            projection,
            max_attempts,
        }
    }

    /// Returns a perturbed, projected copy of `weights`.
    ///
    /// Each component receives an independent `uniform(-bound, bound)` shift.
    ///
    /// # Errors
    ///
    /// [`PortfolioError::DegenerateNormalization`] when all `max_attempts`
    /// perturbations collapsed to the zero vector.
    pub fn propose<R: Rng>(&self, weights: &[f64], rng: &mut R) -> Result<Vec<f64>> {
        for _ in 0..self.max_attempts {
            let mut candidate: Vec<f64> = weights
                .iter()
                .map(|w| w + rng.random_range(-self.bound..self.bound))
                .collect();
            match self.projection.project(&mut candidate) {
                Ok(()) => return Ok(candidate),
                Err(PortfolioError::DegenerateNormalization { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(PortfolioError::DegenerateNormalization {
            attempts: self.max_attempts,
        })
    }
}
