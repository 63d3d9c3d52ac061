//! Signal-fusion strategy engine
//!
//! Turns a ticker's price history and recent news headlines into a
//! BUY/SELL/HOLD recommendation with confidence, risk metrics and price levels:
//!
//! - Indicator calculation (SMA, RSI, MACD, Bollinger Bands)
//! - Discrete signal classification per indicator family
//! - Headline sentiment aggregation
//! - Vote-based recommendation with confidence scoring
//! - Volatility, risk-adjusted return and drawdown metrics
//! - Entry, stop-loss and target levels
//!
//! # Architecture
//!
//! [`analysis`] holds the pure fusion pipeline. [`StrategyAssembler`] drives it
//! from injected collaborators ([`PriceHistoryProvider`], [`HeadlineProvider`],
//! [`PolarityScorer`]); [`api`] provides the network implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strategy_engine::{
//!     LexiconScorer, NoHeadlines, StrategyAssembler, StrategyConfig, YahooFinanceClient,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let assembler = StrategyAssembler::new(
//!         Arc::new(StrategyConfig::from_env()?),
//!         Arc::new(YahooFinanceClient::new()),
//!         Arc::new(NoHeadlines),
//!         Arc::new(LexiconScorer::new()),
//!     );
//!
//!     let result = assembler.generate("AAPL").await?;
//!     println!("{}", result.summary());
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod holdings;
pub mod market;
pub mod providers;
pub mod scoring;

// Re-export main types for convenience
pub use analysis::{Recommendation, RiskMetrics, SignalCategory, SignalLabel, SignalSet};
pub use api::{AlphaVantageClient, NewsApiClient, YahooFinanceClient};
pub use cache::{CachedHeadlineProvider, CachedPriceProvider};
pub use config::{StrategyConfig, StrategyConfigBuilder};
pub use engine::{StrategyAssembler, StrategyReport, StrategyResult};
pub use error::{Result, StrategyError};
pub use forecast::DriftForecaster;
pub use holdings::HoldingsLedger;
pub use market::{HistoryPeriod, PriceBar};
pub use providers::{
    CompanyFundamentals, FundamentalsProvider, HeadlineProvider, NoHeadlines, PolarityScorer,
    PriceForecaster, PriceHistoryProvider,
};
pub use scoring::LexiconScorer;
