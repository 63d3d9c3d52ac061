//! Error types for strategy generation

use thiserror::Error;

/// Strategy generation errors
#[derive(Debug, Error)]
pub enum StrategyError {
    /// No usable price history for the ticker
    #[error("Data not available for {ticker}: {reason}")]
    DataUnavailable {
        ticker: String,
        reason: String,
    },

    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Unrecognised history period string
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantageError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Polarity scoring failed for a piece of text
    #[error("Scoring error: {0}")]
    ScoringError(String),

    /// Holding quantity rejected by the ledger
    #[error("Invalid quantity {shares} for {ticker}")]
    InvalidQuantity {
        ticker: String,
        shares: f64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type alias for strategy operations
pub type Result<T> = std::result::Result<T, StrategyError>;

impl StrategyError {
    /// Shorthand for a data-unavailable error
    pub fn data_unavailable(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }
}

/// Convert anyhow::Error to StrategyError
impl From<anyhow::Error> for StrategyError {
    fn from(err: anyhow::Error) -> Self {
        StrategyError::Other(err.to_string())
    }
}

impl From<ta::errors::TaError> for StrategyError {
    fn from(err: ta::errors::TaError) -> Self {
        StrategyError::IndicatorError(err.to_string())
    }
}

impl From<strategy_utils::EnvError> for StrategyError {
    fn from(err: strategy_utils::EnvError) -> Self {
        StrategyError::ConfigError(err.to_string())
    }
}
