//! Configuration for strategy generation

use crate::analysis::indicators::IndicatorSettings;
use crate::analysis::signals::MIN_SIGNAL_BARS;
use crate::error::{Result, StrategyError};
use crate::market::HistoryPeriod;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strategy_utils::{env_parse, env_string};

/// Configuration passed into the strategy assembler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Look-back window for price history
    pub history_period: HistoryPeriod,

    /// Bar interval requested from the price provider (e.g. "1d")
    pub history_interval: String,

    /// Annual risk-free rate subtracted from the annualised mean return
    pub risk_free_rate: f64,

    /// Number of headlines requested from the news provider
    pub headline_fetch_count: usize,

    /// Number of headlines kept on the result
    pub headline_display_count: usize,

    /// Bars required before any technical signal is produced
    pub min_signal_bars: usize,

    /// Indicator windows
    pub indicators: IndicatorSettings,

    /// Cache TTL for price history
    pub cache_ttl_prices: Duration,

    /// Cache TTL for news data
    pub cache_ttl_news: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// NewsAPI key (optional)
    pub news_api_key: Option<String>,

    /// Alpha Vantage API key (optional)
    pub alpha_vantage_api_key: Option<String>,

    /// NewsAPI requests per minute
    pub news_rate_limit: u32,

    /// Alpha Vantage requests per minute
    pub alpha_vantage_rate_limit: u32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            history_period: HistoryPeriod::SixMonths,
            history_interval: "1d".to_string(),
            risk_free_rate: 0.0,
            headline_fetch_count: 20,
            headline_display_count: 5,
            min_signal_bars: MIN_SIGNAL_BARS,
            indicators: IndicatorSettings::default(),
            cache_ttl_prices: Duration::from_secs(60),   // 1 minute
            cache_ttl_news: Duration::from_secs(300),    // 5 minutes
            request_timeout: Duration::from_secs(30),
            news_api_key: None,
            alpha_vantage_api_key: None,
            news_rate_limit: 60,
            alpha_vantage_rate_limit: 5,
        }
    }
}

impl StrategyConfig {
    /// Create a new configuration builder
    pub fn builder() -> StrategyConfigBuilder {
        StrategyConfigBuilder::default()
    }

    /// Defaults overlaid with `STRATEGY_*` variables and API keys from the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default().with_env_api_keys();

        if let Some(period) = env_string("STRATEGY_PERIOD") {
            config.history_period = period.parse()?;
        }
        if let Some(interval) = env_string("STRATEGY_INTERVAL") {
            config.history_interval = interval;
        }
        if let Some(rate) = env_parse::<f64>("STRATEGY_RISK_FREE_RATE")? {
            config.risk_free_rate = rate;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load NewsAPI and Alpha Vantage keys from environment
    pub fn with_env_api_keys(mut self) -> Self {
        if let Some(key) = env_string("NEWSAPI_KEY") {
            self.news_api_key = Some(key);
        }
        if let Some(key) = env_string("ALPHA_VANTAGE_API_KEY") {
            self.alpha_vantage_api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(StrategyError::ConfigError(
                "risk_free_rate must be a finite number".to_string(),
            ));
        }

        if self.headline_fetch_count == 0 || self.headline_display_count == 0 {
            return Err(StrategyError::ConfigError(
                "headline counts must be greater than 0".to_string(),
            ));
        }

        if self.headline_display_count > self.headline_fetch_count {
            return Err(StrategyError::ConfigError(format!(
                "headline_display_count ({}) exceeds headline_fetch_count ({})",
                self.headline_display_count, self.headline_fetch_count
            )));
        }

        if self.min_signal_bars < 2 {
            return Err(StrategyError::ConfigError(
                "min_signal_bars must be at least 2".to_string(),
            ));
        }

        if self.history_interval.trim().is_empty() {
            return Err(StrategyError::ConfigError(
                "history_interval must not be empty".to_string(),
            ));
        }

        self.indicators.validate()
    }
}

/// Builder for StrategyConfig
#[derive(Debug, Default)]
pub struct StrategyConfigBuilder {
    history_period: Option<HistoryPeriod>,
    history_interval: Option<String>,
    risk_free_rate: Option<f64>,
    headline_fetch_count: Option<usize>,
    headline_display_count: Option<usize>,
    min_signal_bars: Option<usize>,
    indicators: Option<IndicatorSettings>,
    cache_ttl_prices: Option<Duration>,
    cache_ttl_news: Option<Duration>,
    request_timeout: Option<Duration>,
    news_api_key: Option<String>,
    alpha_vantage_api_key: Option<String>,
    news_rate_limit: Option<u32>,
    alpha_vantage_rate_limit: Option<u32>,
}

impl StrategyConfigBuilder {
    /// Set the history look-back window
    pub fn history_period(mut self, period: HistoryPeriod) -> Self {
        self.history_period = Some(period);
        self
    }

    /// Set the bar interval
    pub fn history_interval(mut self, interval: impl Into<String>) -> Self {
        self.history_interval = Some(interval.into());
        self
    }

    /// Set the annual risk-free rate
    pub fn risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    /// Set how many headlines are fetched
    pub fn headline_fetch_count(mut self, count: usize) -> Self {
        self.headline_fetch_count = Some(count);
        self
    }

    /// Set how many headlines are kept on the result
    pub fn headline_display_count(mut self, count: usize) -> Self {
        self.headline_display_count = Some(count);
        self
    }

    /// Set the minimum bar count for technical signals
    pub fn min_signal_bars(mut self, bars: usize) -> Self {
        self.min_signal_bars = Some(bars);
        self
    }

    /// Set indicator windows
    pub fn indicators(mut self, settings: IndicatorSettings) -> Self {
        self.indicators = Some(settings);
        self
    }

    /// Set cache TTL for price history
    pub fn cache_ttl_prices(mut self, duration: Duration) -> Self {
        self.cache_ttl_prices = Some(duration);
        self
    }

    /// Set cache TTL for news data
    pub fn cache_ttl_news(mut self, duration: Duration) -> Self {
        self.cache_ttl_news = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set NewsAPI key
    pub fn news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }

    /// Set Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Set NewsAPI requests per minute
    pub fn news_rate_limit(mut self, per_minute: u32) -> Self {
        self.news_rate_limit = Some(per_minute);
        self
    }

    /// Set Alpha Vantage requests per minute
    pub fn alpha_vantage_rate_limit(mut self, per_minute: u32) -> Self {
        self.alpha_vantage_rate_limit = Some(per_minute);
        self
    }

    /// Load API keys from environment, keeping any set explicitly
    pub fn with_env_api_keys(mut self) -> Self {
        if self.news_api_key.is_none() {
            self.news_api_key = env_string("NEWSAPI_KEY");
        }
        if self.alpha_vantage_api_key.is_none() {
            self.alpha_vantage_api_key = env_string("ALPHA_VANTAGE_API_KEY");
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StrategyConfig> {
        let defaults = StrategyConfig::default();

        let config = StrategyConfig {
            history_period: self.history_period.unwrap_or(defaults.history_period),
            history_interval: self.history_interval.unwrap_or(defaults.history_interval),
            risk_free_rate: self.risk_free_rate.unwrap_or(defaults.risk_free_rate),
            headline_fetch_count: self
                .headline_fetch_count
                .unwrap_or(defaults.headline_fetch_count),
            headline_display_count: self
                .headline_display_count
                .unwrap_or(defaults.headline_display_count),
            min_signal_bars: self.min_signal_bars.unwrap_or(defaults.min_signal_bars),
            indicators: self.indicators.unwrap_or(defaults.indicators),
            cache_ttl_prices: self.cache_ttl_prices.unwrap_or(defaults.cache_ttl_prices),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_api_key: self.news_api_key,
            alpha_vantage_api_key: self.alpha_vantage_api_key,
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
            alpha_vantage_rate_limit: self
                .alpha_vantage_rate_limit
                .unwrap_or(defaults.alpha_vantage_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StrategyConfig::default();
        assert_eq!(config.history_period, HistoryPeriod::SixMonths);
        assert_eq!(config.history_interval, "1d");
        assert_eq!(config.min_signal_bars, MIN_SIGNAL_BARS);
        assert_eq!(config.min_signal_bars, 50);
        assert_eq!(config.headline_display_count, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = StrategyConfig::builder()
            .history_period(HistoryPeriod::OneYear)
            .risk_free_rate(0.02)
            .request_timeout(Duration::from_secs(60))
            .news_api_key("test_key")
            .build()
            .unwrap();

        assert_eq!(config.history_period, HistoryPeriod::OneYear);
        assert!((config.risk_free_rate - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.news_api_key.as_deref(), Some("test_key"));
    }

    #[test]
    fn test_builder_rate_limits() {
        let config = StrategyConfig::builder()
            .news_rate_limit(30)
            .alpha_vantage_rate_limit(75)
            .build()
            .unwrap();
        assert_eq!(config.news_rate_limit, 30);
        assert_eq!(config.alpha_vantage_rate_limit, 75);

        let defaults = StrategyConfig::builder().build().unwrap();
        assert_eq!(defaults.news_rate_limit, 60);
        assert_eq!(defaults.alpha_vantage_rate_limit, 5);
    }

    #[test]
    fn test_validation_rejects_non_finite_rate() {
        let config = StrategyConfig {
            risk_free_rate: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_headline_counts() {
        let result = StrategyConfig::builder()
            .headline_fetch_count(3)
            .headline_display_count(5)
            .build();
        assert!(matches!(result, Err(StrategyError::ConfigError(_))));
    }

    #[test]
    fn test_validation_min_signal_bars() {
        let config = StrategyConfig {
            min_signal_bars: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serializes() {
        let config = StrategyConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["history_period"], "6mo");
        assert_eq!(json["indicators"]["rsi_period"], 14);
    }
}
