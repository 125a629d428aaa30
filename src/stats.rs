//! Per-asset return statistics from closing prices.
//!
//! Produces the return and risk vectors the optimizer consumes. Everything
//! here is in-memory; fetching and storing prices is the caller's concern.
//!
//! - daily return: `c_t / c_{t-1} - 1`
//! - annualized return: `mean(daily) * 252`
//! - annualized risk: `std(daily, n - 1) * sqrt(252)`

use crate::error::{PortfolioError, Result};
use tracing::debug;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Percentage change between consecutive closes.
///
/// Returns one fewer element than `closes`.
///
/// # Errors
///
/// [`PortfolioError::Domain`] if a close is not finite or a divisor is zero.
pub fn daily_returns(closes: &[f64]) -> Result<Vec<f64>> {
    if closes.iter().any(|c| !c.is_finite()) {
        return Err(PortfolioError::Domain("closes must be finite".into()));
    }
    closes
        .windows(2)
        .map(|pair| {
            if pair[0] == 0.0 {
                Err(PortfolioError::Domain("zero close price".into()))
            } else {
                Ok(pair[1] / pair[0] - 1.0)
            }
        })
        .collect()
}

/// Mean daily return scaled to a year.
pub fn annualized_return(daily: &[f64]) -> Result<f64> {
    if daily.is_empty() {
        return Err(PortfolioError::InsufficientData(
            "annualized return needs at least one daily return".into(),
        ));
    }
    Ok(mean(daily) * TRADING_DAYS)
}

/// Sample standard deviation of daily returns scaled to a year.
pub fn annualized_risk(daily: &[f64]) -> Result<f64> {
    if daily.len() < 2 {
        return Err(PortfolioError::InsufficientData(
            "annualized risk needs at least two daily returns".into(),
        ));
    }
    let m = mean(daily);
    let var = daily.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (daily.len() - 1) as f64;
    Ok(var.sqrt() * TRADING_DAYS.sqrt())
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Annualized return and risk of one asset, as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetStats {
    pub annualized_return: f64,
    pub annualized_risk: f64,
}

impl AssetStats {
    /// Computes both statistics from a closing price series (at least 3 closes).
    pub fn from_closes(closes: &[f64]) -> Result<Self> {
        let daily = daily_returns(closes)?;
        Ok(Self {
            annualized_return: annualized_return(&daily)?,
            annualized_risk: annualized_risk(&daily)?,
        })
    }

    /// Both figures scaled to percent, the unit the optimizer presets assume.
    pub fn as_percent(&self) -> Self {
        Self {
            annualized_return: self.annualized_return * 100.0,
            annualized_risk: self.annualized_risk * 100.0,
        }
    }
}

/// Statistics for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearlyStats {
    pub year: i32,
    pub stats: AssetStats,
}

/// Splits chronological `(year, close)` observations by year and computes
/// statistics for each.
///
/// Daily returns never cross a year boundary. Years with fewer than three
/// closes are skipped.
///
/// # Errors
///
/// [`PortfolioError::Domain`] if years go backwards or a close is invalid.
pub fn yearly_stats(observations: &[(i32, f64)]) -> Result<Vec<YearlyStats>> {
    if observations.windows(2).any(|w| w[1].0 < w[0].0) {
        return Err(PortfolioError::Domain(
            "observations must be in chronological order".into(),
        ));
    }

    let mut out = Vec::new();
    for chunk in observations.chunk_by(|a, b| a.0 == b.0) {
        let year = chunk[0].0;
        if chunk.len() < 3 {
            debug!(year, closes = chunk.len(), "skipping year with too few closes");
            continue;
        }
        let closes: Vec<f64> = chunk.iter().map(|&(_, c)| c).collect();
        out.push(YearlyStats {
            year,
            stats: AssetStats::from_closes(&closes)?,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_returns() {
        let r = daily_returns(&[100.0, 110.0, 99.0]).unwrap();
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_daily_returns_zero_close() {
        assert!(matches!(
            daily_returns(&[0.0, 1.0]),
            Err(PortfolioError::Domain(_))
        ));
    }

    #[test]
    fn test_annualized_return() {
        let r = annualized_return(&[0.001, 0.003]).unwrap();
        assert!((r - 0.002 * 252.0).abs() < 1e-12);
        assert!(annualized_return(&[]).is_err());
    }

    #[test]
    fn test_annualized_risk_sample_std() {
        // sample std of [0.01, -0.01] is sqrt(0.0002)
        let s = annualized_risk(&[0.01, -0.01]).unwrap();
        assert!((s - 0.0002_f64.sqrt() * 252.0_f64.sqrt()).abs() < 1e-12);
        assert!(matches!(
            annualized_risk(&[0.01]),
            Err(PortfolioError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_constant_prices_zero_risk() {
        let stats = AssetStats::from_closes(&[50.0; 10]).unwrap();
        assert_eq!(stats.annualized_return, 0.0);
        assert_eq!(stats.annualized_risk, 0.0);
    }

    #[test]
    fn test_as_percent() {
        let stats = AssetStats {
            annualized_return: 0.2122,
            annualized_risk: 0.2593,
        }
        .as_percent();
        assert!((stats.annualized_return - 21.22).abs() < 1e-9);
        assert!((stats.annualized_risk - 25.93).abs() < 1e-9);
    }

    #[test]
    fn test_yearly_split() {
        let obs = [
            (2020, 100.0),
            (2020, 101.0),
            (2020, 102.0),
            (2021, 200.0),
            (2021, 190.0),
            (2022, 10.0),
            (2022, 11.0),
            (2022, 12.0),
            (2022, 13.0),
        ];
        let years = yearly_stats(&obs).unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2020);
        assert_eq!(years[1].year, 2022);
        // no return computed across the 2020 -> 2022 gap
        let expected = AssetStats::from_closes(&[10.0, 11.0, 12.0, 13.0]).unwrap();
        assert_eq!(years[1].stats, expected);
    }

    #[test]
    fn test_yearly_out_of_order() {
        assert!(yearly_stats(&[(2021, 1.0), (2020, 1.0)]).is_err());
    }
}
