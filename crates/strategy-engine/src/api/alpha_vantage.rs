//! Alpha Vantage API client (company fundamentals)

use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};
use crate::providers::{CompanyFundamentals, FundamentalsProvider};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// Company overview payload; numbers arrive as strings, "None" when absent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyOverview {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    pub market_cap: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "DividendYield")]
    pub dividend_yield: Option<String>,
    pub beta: Option<String>,
    #[serde(rename = "52WeekHigh")]
    pub week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    pub week_52_low: Option<String>,
}

impl CompanyOverview {
    /// Typed view of the overview
    pub fn into_fundamentals(self) -> CompanyFundamentals {
        CompanyFundamentals {
            ticker: self.symbol,
            name: non_empty(self.name),
            pe_ratio: parse_number(self.pe_ratio.as_deref()),
            market_cap: parse_number(self.market_cap.as_deref()),
            dividend_yield: parse_number(self.dividend_yield.as_deref()),
            sector: non_empty(self.sector),
            industry: non_empty(self.industry),
            beta: parse_number(self.beta.as_deref()),
            week_52_high: parse_number(self.week_52_high.as_deref()),
            week_52_low: parse_number(self.week_52_low.as_deref()),
        }
    }
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.is_empty() && value != "None")
}

impl AlphaVantageClient {
    /// Create a new Alpha Vantage client with API key and rate limit
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API key
    /// * `rate_limit` - Maximum requests per minute (free tier: 5)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit)
                .or(NonZeroU32::new(5))
                .unwrap_or(NonZeroU32::MIN),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Create from the configured key and limits
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        let api_key = config.alpha_vantage_api_key.clone().ok_or_else(|| {
            StrategyError::ConfigError(
                "ALPHA_VANTAGE_API_KEY is required for fundamentals".to_string(),
            )
        })?;

        Self::new(
            api_key,
            config.alpha_vantage_rate_limit,
            config.request_timeout,
        )
    }

    /// Get the company overview for a symbol
    pub async fn get_company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let params = [
            ("function", "OVERVIEW"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];

        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StrategyError::AlphaVantageError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: serde_json::Value = response.json().await?;
        parse_overview(symbol, data)
    }
}

fn parse_overview(symbol: &str, data: serde_json::Value) -> Result<CompanyOverview> {
    if let Some(error) = data.get("Error Message") {
        return Err(StrategyError::AlphaVantageError(error.to_string()));
    }

    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(StrategyError::RateLimitExceeded {
            provider: "Alpha Vantage".to_string(),
        });
    }

    // An empty object means the symbol is unknown
    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(StrategyError::data_unavailable(
            symbol,
            "No company overview available",
        ));
    }

    Ok(serde_json::from_value(data)?)
}

#[async_trait]
impl FundamentalsProvider for AlphaVantageClient {
    async fn fetch_fundamentals(&self, ticker: &str) -> Result<CompanyFundamentals> {
        let overview = self.get_company_overview(ticker).await?;
        Ok(overview.into_fundamentals())
    }
}
