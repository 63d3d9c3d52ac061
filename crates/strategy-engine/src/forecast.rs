//! Deterministic drift projection

use crate::analysis::risk::period_returns;
use crate::error::Result;
use crate::market::{PriceBar, closes};
use crate::providers::PriceForecaster;

/// Compounds the last close by the mean historical period return
#[derive(Debug, Clone, Copy, Default)]
pub struct DriftForecaster;

impl PriceForecaster for DriftForecaster {
    fn forecast(&self, bars: &[PriceBar], horizon: usize) -> Result<Vec<f64>> {
        let Some(last) = bars.last() else {
            return Ok(Vec::new());
        };

        let returns = period_returns(&closes(bars));
        let drift = if returns.is_empty() {
            0.0
        } else {
            returns.iter().sum::<f64>() / returns.len() as f64
        };

        let mut price = last.close;
        Ok((0..horizon)
            .map(|_| {
                price *= 1.0 + drift;
                price
            })
            .collect())
    }
}
