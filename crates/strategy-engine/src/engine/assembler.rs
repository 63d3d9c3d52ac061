//! Per-ticker strategy assembly
//!
//! Fetches history, runs the pure analysis pipeline and folds in headline
//! sentiment. Price data is mandatory; sentiment is best effort.

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;

use crate::analysis::{
    IndicatorSeries, PriceLevels, RiskMetrics, aggregate_sentiment, classify, recommend,
};
use crate::config::StrategyConfig;
use crate::error::{Result, StrategyError};
use crate::market::{PriceBar, closes};
use crate::providers::{HeadlineProvider, PolarityScorer, PriceHistoryProvider};

use super::result::{StrategyReport, StrategyResult};

/// Aggregated headline polarity plus the headlines kept for display
#[derive(Debug, Clone, Default, PartialEq)]
struct Sentiment {
    score: f64,
    headlines: Vec<String>,
}

/// Turns a ticker into a [`StrategyResult`]
#[derive(Clone)]
pub struct StrategyAssembler {
    config: Arc<StrategyConfig>,
    prices: Arc<dyn PriceHistoryProvider>,
    headlines: Arc<dyn HeadlineProvider>,
    scorer: Arc<dyn PolarityScorer>,
}

impl StrategyAssembler {
    pub fn new(
        config: Arc<StrategyConfig>,
        prices: Arc<dyn PriceHistoryProvider>,
        headlines: Arc<dyn HeadlineProvider>,
        scorer: Arc<dyn PolarityScorer>,
    ) -> Self {
        Self {
            config,
            prices,
            headlines,
            scorer,
        }
    }

    pub fn with_config(mut self, config: Arc<StrategyConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_prices(mut self, prices: Arc<dyn PriceHistoryProvider>) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_headlines(mut self, headlines: Arc<dyn HeadlineProvider>) -> Self {
        self.headlines = headlines;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn PolarityScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Generate a strategy for one ticker
    ///
    /// Fails with [`StrategyError::DataUnavailable`] when no price history can
    /// be obtained. Missing or unscorable headlines only neutralise sentiment.
    pub async fn generate(&self, ticker: &str) -> Result<StrategyResult> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(StrategyError::data_unavailable(ticker, "empty ticker"));
        }

        let bars = self.fetch_bars(&ticker).await?;
        let closes = closes(&bars);
        let Some(&current_price) = closes.last() else {
            return Err(StrategyError::data_unavailable(ticker, "no price history"));
        };

        let series = IndicatorSeries::compute(&closes, &self.config.indicators)?;
        let signals = classify(&series, self.config.min_signal_bars);
        if signals.is_empty() {
            tracing::debug!(%ticker, bars = closes.len(), "not enough history for technical signals");
        }

        let sentiment = self.sentiment(&ticker).await;
        let (recommendation, confidence) = recommend(&signals, sentiment.score);
        let risk_metrics = RiskMetrics::compute(&closes, self.config.risk_free_rate);
        let levels = PriceLevels::for_recommendation(current_price, recommendation);

        let result = StrategyResult {
            ticker,
            current_price,
            recommendation,
            confidence,
            technical_signals: signals,
            sentiment_score: sentiment.score,
            news_headlines: sentiment.headlines,
            risk_metrics,
            entry_points: levels.entry_points,
            stop_loss: levels.stop_loss,
            target_price: levels.target_price,
            analysis_timestamp: Utc::now(),
        };

        tracing::info!("Generated strategy: {}", result.summary());
        Ok(result)
    }

    /// Generate strategies for several tickers concurrently
    ///
    /// Reports come back in input order; a failed ticker does not affect the rest.
    pub async fn generate_batch<S: AsRef<str>>(&self, tickers: &[S]) -> Vec<StrategyReport> {
        tracing::info!("Starting strategy generation for {} tickers", tickers.len());

        let futures = tickers.iter().map(|ticker| async move {
            let ticker = ticker.as_ref();
            match self.generate(ticker).await {
                Ok(result) => StrategyReport::Generated(result),
                Err(e) => {
                    tracing::warn!(%ticker, error = %e, "strategy generation failed");
                    StrategyReport::failed(ticker.trim().to_uppercase(), &e)
                }
            }
        });

        join_all(futures).await
    }

    async fn fetch_bars(&self, ticker: &str) -> Result<Vec<PriceBar>> {
        let bars = self
            .prices
            .fetch_history(
                ticker,
                self.config.history_period,
                &self.config.history_interval,
            )
            .await
            .map_err(|e| StrategyError::data_unavailable(ticker, e.to_string()))?;

        if bars.is_empty() {
            return Err(StrategyError::data_unavailable(ticker, "no price history"));
        }
        Ok(bars)
    }

    async fn sentiment(&self, ticker: &str) -> Sentiment {
        let headlines = match self
            .headlines
            .fetch_headlines(ticker, self.config.headline_fetch_count)
            .await
        {
            Ok(headlines) => headlines,
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "headline fetch failed, using neutral sentiment");
                return Sentiment::default();
            }
        };

        if headlines.is_empty() {
            tracing::debug!(%ticker, "no headlines found");
            return Sentiment::default();
        }

        match self.score_all(&headlines) {
            Ok(scores) => Sentiment {
                score: aggregate_sentiment(&scores),
                headlines: headlines
                    .into_iter()
                    .take(self.config.headline_display_count)
                    .collect(),
            },
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "headline scoring failed, using neutral sentiment");
                Sentiment::default()
            }
        }
    }

    fn score_all(&self, headlines: &[String]) -> Result<Vec<f64>> {
        headlines
            .iter()
            .map(|headline| {
                let score = self.scorer.score(headline)?;
                if score.is_finite() {
                    Ok(score.clamp(-1.0, 1.0))
                } else {
                    Err(StrategyError::ScoringError(format!(
                        "non-finite polarity for {headline:?}"
                    )))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Recommendation, SignalCategory, SignalLabel};
    use crate::providers::{MockHeadlineProvider, MockPolarityScorer, MockPriceHistoryProvider};
    use chrono::Duration;

    fn bars(closes: impl IntoIterator<Item = f64>) -> Vec<PriceBar> {
        let start = Utc::now() - Duration::days(365);
        closes
            .into_iter()
            .enumerate()
            .map(|(i, close)| PriceBar::flat(start + Duration::days(i as i64), close))
            .collect()
    }

    fn prices_returning(history: Vec<PriceBar>) -> MockPriceHistoryProvider {
        let mut prices = MockPriceHistoryProvider::new();
        prices
            .expect_fetch_history()
            .returning(move |_, _, _| Ok(history.clone()));
        prices
    }

    fn headlines_returning(headlines: Vec<&'static str>) -> MockHeadlineProvider {
        let mut provider = MockHeadlineProvider::new();
        provider.expect_fetch_headlines().returning(move |_, _| {
            Ok(headlines.iter().map(|h| (*h).to_string()).collect())
        });
        provider
    }

    fn failing_headlines() -> MockHeadlineProvider {
        let mut provider = MockHeadlineProvider::new();
        provider
            .expect_fetch_headlines()
            .returning(|_, _| Err(StrategyError::ApiError("NewsAPI down".to_string())));
        provider
    }

    fn scorer_returning(score: f64) -> MockPolarityScorer {
        let mut scorer = MockPolarityScorer::new();
        scorer.expect_score().returning(move |_| Ok(score));
        scorer
    }

    fn assembler(
        prices: MockPriceHistoryProvider,
        headlines: MockHeadlineProvider,
        scorer: MockPolarityScorer,
    ) -> StrategyAssembler {
        StrategyAssembler::new(
            Arc::new(StrategyConfig::default()),
            Arc::new(prices),
            Arc::new(headlines),
            Arc::new(scorer),
        )
    }

    #[tokio::test]
    async fn test_empty_history_is_data_unavailable() {
        let mut headlines = MockHeadlineProvider::new();
        headlines.expect_fetch_headlines().times(0);

        let assembler = assembler(prices_returning(Vec::new()), headlines, scorer_returning(0.0));
        let result = assembler.generate("ZZZZ").await;

        assert!(matches!(
            result,
            Err(StrategyError::DataUnavailable { ref ticker, .. }) if ticker == "ZZZZ"
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_data_unavailable() {
        let mut prices = MockPriceHistoryProvider::new();
        prices
            .expect_fetch_history()
            .returning(|_, _, _| Err(StrategyError::YahooFinanceError("timeout".to_string())));

        let assembler = assembler(prices, failing_headlines(), scorer_returning(0.0));
        assert!(matches!(
            assembler.generate("AAPL").await,
            Err(StrategyError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_ticker_rejected() {
        let assembler = assembler(
            MockPriceHistoryProvider::new(),
            MockHeadlineProvider::new(),
            MockPolarityScorer::new(),
        );
        assert!(matches!(
            assembler.generate("   ").await,
            Err(StrategyError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_short_history_holds_without_signals() {
        let assembler = assembler(
            prices_returning(bars(vec![100.0; 10])),
            failing_headlines(),
            scorer_returning(0.9),
        );
        let result = assembler.generate("AAPL").await.unwrap();

        assert!(result.technical_signals.is_empty());
        assert_eq!(result.recommendation, Recommendation::Hold);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.sentiment_score, 0.0);
        assert!(result.news_headlines.is_empty());
        assert_eq!(result.current_price, 100.0);
        assert_eq!(result.entry_points.primary, 100.0);
        assert_eq!(result.target_price, 100.0);
        assert_eq!(result.stop_loss, None);
        assert_eq!(result.risk_metrics.volatility, 0.0);
        assert_eq!(result.risk_metrics.beta, 1.0);
    }

    #[tokio::test]
    async fn test_headlines_scored_then_truncated() {
        let headlines = vec!["h1", "h2", "h3", "h4", "h5", "h6", "h7", "h8"];
        let mut scorer = MockPolarityScorer::new();
        scorer.expect_score().times(8).returning(|_| Ok(0.5));

        let assembler = assembler(
            prices_returning(bars(vec![50.0; 20])),
            headlines_returning(headlines),
            scorer,
        );
        let result = assembler.generate("msft").await.unwrap();

        assert_eq!(result.sentiment_score, 0.5);
        assert_eq!(result.news_headlines, vec!["h1", "h2", "h3", "h4", "h5"]);
        // no technical signals, sentiment alone cannot lead by two votes
        assert_eq!(result.recommendation, Recommendation::Hold);
        assert_eq!(result.confidence, 25.0);
    }

    #[tokio::test]
    async fn test_each_score_clamped_before_averaging() {
        let mut scorer = MockPolarityScorer::new();
        scorer
            .expect_score()
            .returning(|headline| Ok(if headline == "euphoric" { 5.0 } else { -0.9 }));

        let assembler = assembler(
            prices_returning(bars(vec![20.0; 5])),
            headlines_returning(vec!["euphoric", "gloomy"]),
            scorer,
        );
        let result = assembler.generate("AAPL").await.unwrap();

        // 5.0 counts as 1.0 before averaging: (1.0 - 0.9) / 2
        assert!((result.sentiment_score - 0.05).abs() < 1e-12);
        assert_eq!(result.news_headlines, vec!["euphoric", "gloomy"]);
    }

    #[tokio::test]
    async fn test_scoring_failure_neutralises_sentiment() {
        let mut scorer = MockPolarityScorer::new();
        scorer
            .expect_score()
            .returning(|_| Err(StrategyError::ScoringError("model unavailable".to_string())));

        let assembler = assembler(
            prices_returning(bars(vec![10.0; 5])),
            headlines_returning(vec!["Apple beats estimates"]),
            scorer,
        );
        let result = assembler.generate("AAPL").await.unwrap();

        assert_eq!(result.sentiment_score, 0.0);
        assert!(result.news_headlines.is_empty());
    }

    #[tokio::test]
    async fn test_ticker_normalised_before_fetch() {
        let mut prices = MockPriceHistoryProvider::new();
        prices
            .expect_fetch_history()
            .withf(|ticker, _, interval| ticker == "AAPL" && interval == "1d")
            .times(1)
            .returning(|_, _, _| Ok(bars(vec![1.0, 2.0])));

        let mut headlines = MockHeadlineProvider::new();
        headlines
            .expect_fetch_headlines()
            .withf(|ticker, count| ticker == "AAPL" && *count == 20)
            .returning(|_, _| Ok(Vec::new()));

        let assembler = assembler(prices, headlines, MockPolarityScorer::new());
        let result = assembler.generate("  aapl ").await.unwrap();
        assert_eq!(result.ticker, "AAPL");
    }

    #[tokio::test]
    async fn test_long_decline_yields_full_signal_set() {
        let closes = (0..80).map(|i| 200.0 - f64::from(i));
        let assembler = assembler(
            prices_returning(bars(closes)),
            headlines_returning(Vec::new()),
            MockPolarityScorer::new(),
        );
        let result = assembler.generate("DOWN").await.unwrap();

        assert_eq!(result.technical_signals.len(), 4);
        assert_eq!(
            result.technical_signals.get(SignalCategory::Rsi),
            Some(SignalLabel::Oversold)
        );
        assert_eq!(
            result.technical_signals.get(SignalCategory::Ma),
            Some(SignalLabel::BearishTrend)
        );
        assert_eq!(result.current_price, 121.0);
        assert!(result.risk_metrics.max_drawdown < 0.0);
        assert_eq!(result.confidence, 60.0);
    }

    #[tokio::test]
    async fn test_batch_preserves_order_and_isolates_failures() {
        let mut prices = MockPriceHistoryProvider::new();
        prices.expect_fetch_history().returning(|ticker, _, _| {
            Ok(match ticker {
                "BAD" => Vec::new(),
                _ => bars(vec![42.0; 3]),
            })
        });

        let assembler = assembler(prices, headlines_returning(Vec::new()), MockPolarityScorer::new());
        let reports = assembler.generate_batch(&["aapl", "bad", "MSFT"]).await;

        let tickers: Vec<&str> = reports.iter().map(StrategyReport::ticker).collect();
        assert_eq!(tickers, vec!["AAPL", "BAD", "MSFT"]);
        assert!(reports[0].is_generated());
        assert!(!reports[1].is_generated());
        assert!(reports[2].is_generated());
    }
}
