//! In-memory ticker -> share quantity ledger
//!
//! Single-writer bookkeeping; callers sharing it across tasks bring their own lock.

use std::collections::BTreeMap;

use crate::error::{Result, StrategyError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HoldingsLedger {
    positions: BTreeMap<String, f64>,
}

impl HoldingsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add shares, creating the position if needed; returns the new quantity
    pub fn add(&mut self, ticker: &str, shares: f64) -> Result<f64> {
        let ticker = normalize(ticker, shares)?;
        let quantity = self.positions.entry(ticker).or_insert(0.0);
        *quantity += shares;
        Ok(*quantity)
    }

    /// Remove shares; the position is dropped once it reaches zero or below
    ///
    /// Returns the remaining quantity, 0.0 when the position is gone or was never held.
    pub fn remove(&mut self, ticker: &str, shares: f64) -> Result<f64> {
        let ticker = normalize(ticker, shares)?;
        let Some(quantity) = self.positions.get_mut(&ticker) else {
            tracing::debug!(%ticker, "remove on unknown position ignored");
            return Ok(0.0);
        };

        *quantity -= shares;
        if *quantity <= 0.0 {
            self.positions.remove(&ticker);
            return Ok(0.0);
        }
        Ok(*quantity)
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.positions.get(&ticker.trim().to_uppercase()).copied()
    }

    /// Snapshot of all positions, sorted by ticker
    pub fn list(&self) -> Vec<(String, f64)> {
        self.positions
            .iter()
            .map(|(ticker, shares)| (ticker.clone(), *shares))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn normalize(ticker: &str, shares: f64) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() || !shares.is_finite() || shares <= 0.0 {
        return Err(StrategyError::InvalidQuantity { ticker, shares });
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut ledger = HoldingsLedger::new();
        ledger.add("AAPL", 10.0).unwrap();
        ledger.add("GOOG", 5.0).unwrap();
        assert_eq!(ledger.remove("AAPL", 3.0).unwrap(), 7.0);

        assert_eq!(
            ledger.list(),
            vec![("AAPL".to_string(), 7.0), ("GOOG".to_string(), 5.0)]
        );
    }

    #[test]
    fn test_position_removed_at_zero() {
        let mut ledger = HoldingsLedger::new();
        ledger.add("msft", 4.0).unwrap();
        assert_eq!(ledger.get("MSFT"), Some(4.0));
        assert_eq!(ledger.remove("MSFT", 6.0).unwrap(), 0.0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.get("MSFT"), None);
    }

    #[test]
    fn test_unknown_remove_is_noop() {
        let mut ledger = HoldingsLedger::new();
        assert_eq!(ledger.remove("TSLA", 1.0).unwrap(), 0.0);
        assert_eq!(ledger.len(), 0);
    }

    #[test]
    fn test_rejects_bad_quantities() {
        let mut ledger = HoldingsLedger::new();
        assert!(matches!(
            ledger.add("AAPL", -1.0),
            Err(StrategyError::InvalidQuantity { .. })
        ));
        assert!(ledger.add("AAPL", f64::NAN).is_err());
        assert!(ledger.add("  ", 1.0).is_err());
        assert!(ledger.remove("AAPL", 0.0).is_err());
    }
}
