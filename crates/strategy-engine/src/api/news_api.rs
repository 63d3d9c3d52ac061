//! NewsAPI client for ticker headlines

use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};
use crate::providers::HeadlineProvider;
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// NewsAPI article; only the fields headlines need
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<String>,
}

/// Response envelope of the `everything` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl NewsResponse {
    /// Non-empty article titles, in response order
    pub fn headlines(&self) -> Vec<String> {
        self.articles
            .iter()
            .filter_map(|article| article.title.as_deref())
            .map(str::trim)
            .filter(|title| !title.is_empty() && *title != "[Removed]")
            .map(str::to_string)
            .collect()
    }

    fn into_result(self) -> Result<Self> {
        if self.status == "ok" {
            return Ok(self);
        }

        match self.code.as_deref() {
            Some("rateLimited") => Err(StrategyError::RateLimitExceeded {
                provider: "NewsAPI".to_string(),
            }),
            _ => Err(StrategyError::ApiError(format!(
                "NewsAPI error: {}",
                self.message.as_deref().unwrap_or("unknown error")
            ))),
        }
    }
}

/// NewsAPI client with rate limiting
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl NewsApiClient {
    /// Create a new NewsAPI client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - NewsAPI key
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit)
                .or(NonZeroU32::new(60))
                .unwrap_or(NonZeroU32::MIN),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Create from the configured key; `None` when no key is set
    pub fn from_config(config: &StrategyConfig) -> Result<Option<Self>> {
        config
            .news_api_key
            .as_deref()
            .map(|key| Self::new(key, config.news_rate_limit, config.request_timeout))
            .transpose()
    }

    /// Latest English articles mentioning `query`, newest first
    pub async fn everything(&self, query: &str, page_size: usize) -> Result<NewsResponse> {
        self.rate_limiter.until_ready().await;

        let page_size = page_size.clamp(1, 100).to_string();
        let params = [
            ("q", query),
            ("sortBy", "publishedAt"),
            ("language", "en"),
            ("pageSize", page_size.as_str()),
            ("apiKey", self.api_key.as_str()),
        ];

        let response = self
            .client
            .get(EVERYTHING_URL)
            .query(&params)
            .send()
            .await
            .map_err(|e| StrategyError::ApiError(format!("NewsAPI request failed: {e}")))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(StrategyError::RateLimitExceeded {
                provider: "NewsAPI".to_string(),
            });
        }

        // Error bodies carry the same envelope with status "error"
        let body = response
            .text()
            .await
            .map_err(|e| StrategyError::ApiError(format!("NewsAPI read failed: {e}")))?;

        serde_json::from_str::<NewsResponse>(&body)?.into_result()
    }
}

#[async_trait]
impl HeadlineProvider for NewsApiClient {
    async fn fetch_headlines(&self, ticker: &str, count: usize) -> Result<Vec<String>> {
        let response = self.everything(ticker, count).await?;
        let mut headlines = response.headlines();
        headlines.truncate(count);
        Ok(headlines)
    }
}
