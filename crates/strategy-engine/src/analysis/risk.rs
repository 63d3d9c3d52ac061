//! Risk metrics and recommendation-conditioned price levels

use serde::{Deserialize, Serialize};

use super::recommendation::Recommendation;

/// Daily bars per year
pub const TRADING_DAYS: f64 = 252.0;
/// Market beta placeholder; no index comparison is made
pub const PLACEHOLDER_BETA: f64 = 1.0;
/// Volatility at or below this counts as zero
const ZERO_VOLATILITY: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualised standard deviation of period returns
    pub volatility: f64,
    /// Annualised excess return per unit of volatility
    pub risk_adjusted_return: f64,
    /// Worst close-to-running-peak ratio, always <= 0
    pub max_drawdown: f64,
    pub beta: f64,
}

impl RiskMetrics {
    pub fn compute(closes: &[f64], risk_free_rate: f64) -> Self {
        let returns = period_returns(closes);
        Self {
            volatility: volatility(&returns),
            risk_adjusted_return: risk_adjusted_return(&returns, risk_free_rate),
            max_drawdown: max_drawdown(closes),
            beta: PLACEHOLDER_BETA,
        }
    }
}

/// Simple percentage change between consecutive closes
///
/// A non-positive previous close yields a 0.0 return for that step.
pub fn period_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1); 0.0 below two values
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Annualised volatility of `returns`
pub fn volatility(returns: &[f64]) -> f64 {
    std_dev(returns) * TRADING_DAYS.sqrt()
}

/// `(mean * 252 - risk_free_rate) / volatility`, 0.0 when volatility is zero
pub fn risk_adjusted_return(returns: &[f64], risk_free_rate: f64) -> f64 {
    let vol = volatility(returns);
    if vol <= ZERO_VOLATILITY || !vol.is_finite() {
        return 0.0;
    }
    let ratio = (mean(returns) * TRADING_DAYS - risk_free_rate) / vol;
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Minimum of `close / running_max - 1`; 0.0 below two closes
pub fn max_drawdown(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 0.0;
    }
    let mut peak = closes[0];
    let mut worst = 0.0_f64;

    for &close in closes {
        if close > peak {
            peak = close;
        }
        if peak > 0.0 {
            worst = worst.min(close / peak - 1.0);
        }
    }
    worst
}

/// Round a monetary amount to cents
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryPoints {
    pub primary: f64,
    pub secondary: f64,
}

/// Entry, stop-loss and target around the current close
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    pub entry_points: EntryPoints,
    pub stop_loss: Option<f64>,
    pub target_price: f64,
}

impl PriceLevels {
    pub fn for_recommendation(close: f64, recommendation: Recommendation) -> Self {
        // (primary entry, secondary entry, stop, target) as multiples of close
        let (primary, secondary, stop, target) = match recommendation {
            Recommendation::Buy => (0.98, 0.95, Some(0.92), 1.15),
            Recommendation::Sell => (1.02, 1.05, Some(1.08), 0.85),
            Recommendation::Hold => (1.0, 1.0, None, 1.0),
        };

        Self {
            entry_points: EntryPoints {
                primary: round_price(close * primary),
                secondary: round_price(close * secondary),
            },
            stop_loss: stop.map(|m| round_price(close * m)),
            target_price: round_price(close * target),
        }
    }
}
