//! Capabilities the strategy assembler consumes
//!
//! Each collaborator is injected as `Arc<dyn Trait>`, so real models and
//! data sources can be swapped without touching the fusion logic.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::market::{HistoryPeriod, PriceBar};

/// Source of chronological OHLCV history
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Bars for `ticker` over `period`, oldest first
    ///
    /// An unknown ticker yields an empty vector, not an error.
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: &str,
    ) -> Result<Vec<PriceBar>>;
}

/// Source of recent news headlines
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HeadlineProvider: Send + Sync {
    /// Up to `count` headlines, newest first
    async fn fetch_headlines(&self, ticker: &str, count: usize) -> Result<Vec<String>>;
}

/// Maps a piece of text to a polarity in [-1, 1]
#[cfg_attr(test, automock)]
pub trait PolarityScorer: Send + Sync {
    fn score(&self, text: &str) -> Result<f64>;
}

/// Projects future closes from history
#[cfg_attr(test, automock)]
pub trait PriceForecaster: Send + Sync {
    /// `horizon` projected closes following the last bar
    fn forecast(&self, bars: &[PriceBar], horizon: usize) -> Result<Vec<f64>>;
}

/// Company overview figures, informational only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFundamentals {
    pub ticker: String,
    pub name: Option<String>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub beta: Option<f64>,
    #[serde(rename = "52_week_high")]
    pub week_52_high: Option<f64>,
    #[serde(rename = "52_week_low")]
    pub week_52_low: Option<f64>,
}

/// Source of company fundamentals
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<CompanyFundamentals>;
}

/// Headline source used when no news key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHeadlines;

#[async_trait]
impl HeadlineProvider for NoHeadlines {
    async fn fetch_headlines(&self, _ticker: &str, _count: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
