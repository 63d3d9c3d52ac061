//! Strategy result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{EntryPoints, Recommendation, RiskMetrics, SignalSet};
use crate::error::StrategyError;

/// One generated strategy; built once per ticker and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub ticker: String,
    /// Latest close, unrounded
    pub current_price: f64,
    pub recommendation: Recommendation,
    /// 0 to 100, one decimal
    pub confidence: f64,
    pub technical_signals: SignalSet,
    pub sentiment_score: f64,
    /// Most recent headlines, informational only
    pub news_headlines: Vec<String>,
    pub risk_metrics: RiskMetrics,
    pub entry_points: EntryPoints,
    /// Absent for HOLD
    pub stop_loss: Option<f64>,
    pub target_price: f64,
    pub analysis_timestamp: DateTime<Utc>,
}

impl StrategyResult {
    /// One-line summary for logs and terminals
    pub fn summary(&self) -> String {
        let stop = self
            .stop_loss
            .map_or_else(|| "none".to_string(), |stop| format!("{stop:.2}"));

        format!(
            "{} {} ({:.1}% confidence) @ {:.2} | entry {:.2}/{:.2} stop {} target {:.2} | sentiment {:+.3} | {} signals",
            self.ticker,
            self.recommendation,
            self.confidence,
            self.current_price,
            self.entry_points.primary,
            self.entry_points.secondary,
            stop,
            self.target_price,
            self.sentiment_score,
            self.technical_signals.len(),
        )
    }
}

/// Outcome for one ticker of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategyReport {
    Generated(StrategyResult),
    Failed { ticker: String, error: String },
}

impl StrategyReport {
    pub fn failed(ticker: impl Into<String>, error: &StrategyError) -> Self {
        Self::Failed {
            ticker: ticker.into(),
            error: error.to_string(),
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            Self::Generated(result) => &result.ticker,
            Self::Failed { ticker, .. } => ticker,
        }
    }

    pub fn result(&self) -> Option<&StrategyResult> {
        match self {
            Self::Generated(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SignalCategory, SignalLabel};
    use chrono::TimeZone;

    fn sample() -> StrategyResult {
        StrategyResult {
            ticker: "AAPL".to_string(),
            current_price: 100.0,
            recommendation: Recommendation::Buy,
            confidence: 45.0,
            technical_signals: [
                (SignalCategory::Rsi, SignalLabel::Oversold),
                (SignalCategory::Macd, SignalLabel::BullishCrossover),
            ]
            .into_iter()
            .collect(),
            sentiment_score: 0.3,
            news_headlines: vec!["Apple beats estimates".to_string()],
            risk_metrics: RiskMetrics {
                volatility: 0.25,
                risk_adjusted_return: 1.2,
                max_drawdown: -0.1,
                beta: 1.0,
            },
            entry_points: EntryPoints {
                primary: 98.0,
                secondary: 95.0,
            },
            stop_loss: Some(92.0),
            target_price: 115.0,
            analysis_timestamp: Utc.with_ymd_and_hms(2024, 5, 2, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_result_field_names() {
        let value = serde_json::to_value(sample()).unwrap();

        assert_eq!(value["ticker"], "AAPL");
        assert_eq!(value["recommendation"], "BUY");
        assert_eq!(value["technical_signals"]["rsi"], "oversold");
        assert_eq!(value["technical_signals"]["macd"], "bullish_crossover");
        assert_eq!(value["risk_metrics"]["max_drawdown"], -0.1);
        assert_eq!(value["entry_points"]["secondary"], 95.0);
        assert_eq!(value["stop_loss"], 92.0);
        assert_eq!(value["analysis_timestamp"], "2024-05-02T14:30:00Z");
    }

    #[test]
    fn test_hold_has_null_stop_loss() {
        let result = StrategyResult {
            recommendation: Recommendation::Hold,
            stop_loss: None,
            ..sample()
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["stop_loss"].is_null());
        assert!(result.summary().contains("stop none"));
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert!(summary.starts_with("AAPL BUY (45.0% confidence) @ 100.00"));
        assert!(summary.contains("target 115.00"));
        assert!(summary.contains("sentiment +0.300"));
    }

    #[test]
    fn test_failed_report_shape() {
        let error = StrategyError::data_unavailable("ZZZZ", "no price history");
        let report = StrategyReport::failed("ZZZZ", &error);

        assert_eq!(report.ticker(), "ZZZZ");
        assert!(report.result().is_none());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ticker"], "ZZZZ");
        assert_eq!(value["error"], "Data not available for ZZZZ: no price history");
    }

    #[test]
    fn test_generated_report_is_flat() {
        let report = StrategyReport::Generated(sample());
        assert!(report.is_generated());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ticker"], "AAPL");
        assert!(value.get("error").is_none());
    }
}
