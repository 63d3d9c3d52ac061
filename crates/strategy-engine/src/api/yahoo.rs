//! Yahoo Finance API client

use crate::error::{Result, StrategyError};
use crate::market::{HistoryPeriod, PriceBar};
use crate::providers::PriceHistoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Yahoo Finance API client
#[derive(Debug, Clone, Copy, Default)]
pub struct YahooFinanceClient;

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self
    }

    /// Get historical bars for a symbol over a look-back period
    ///
    /// Fails when Yahoo returns no data; [`PriceHistoryProvider::fetch_history`]
    /// turns that into an empty history.
    pub async fn get_history(
        &self,
        symbol: &str,
        period: HistoryPeriod,
        interval: &str,
    ) -> Result<Vec<PriceBar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| StrategyError::YahooFinanceError(e.to_string()))?;

        let end = Utc::now();
        let start = period.start_from(end);

        // Convert chrono DateTime to time OffsetDateTime
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp()).map_err(|e| {
            StrategyError::YahooFinanceError(format!("Invalid start timestamp: {e}"))
        })?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StrategyError::YahooFinanceError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history_interval(symbol, start_odt, end_odt, interval)
            .await
            .map_err(|e| StrategyError::YahooFinanceError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StrategyError::YahooFinanceError(e.to_string()))?;

        Ok(quotes
            .iter()
            .filter(|q| q.close.is_finite())
            .map(|q| PriceBar {
                timestamp: DateTime::from_timestamp(q.timestamp as i64, 0)
                    .unwrap_or_else(Utc::now),
                open: q.open,
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceClient {
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: &str,
    ) -> Result<Vec<PriceBar>> {
        match self.get_history(ticker, period, interval).await {
            Ok(bars) => Ok(bars),
            Err(StrategyError::YahooFinanceError(reason)) => {
                tracing::debug!(%ticker, %reason, "no price history from Yahoo");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
