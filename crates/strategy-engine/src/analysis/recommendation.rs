//! Fusion of technical signals and sentiment into a recommendation

use serde::{Deserialize, Serialize};
use std::fmt;

use super::signals::{Bias, SignalSet};

/// Sentiment magnitude needed to cast a vote
const SENTIMENT_VOTE_THRESHOLD: f64 = 0.1;
/// Points per technical signal present
const POINTS_PER_SIGNAL: f64 = 15.0;
/// Cap on the technical share of confidence
const MAX_SIGNAL_POINTS: f64 = 60.0;
/// Points per unit of absolute sentiment
const SENTIMENT_POINTS: f64 = 50.0;
const MAX_CONFIDENCE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bullish and bearish vote counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub bullish: usize,
    pub bearish: usize,
}

impl VoteTally {
    /// Count technical labels plus one optional sentiment vote
    pub fn count(signals: &SignalSet, sentiment: f64) -> Self {
        let mut tally = Self::default();
        for (_, label) in signals.iter() {
            match label.bias() {
                Bias::Bullish => tally.bullish += 1,
                Bias::Bearish => tally.bearish += 1,
                Bias::Neutral => {}
            }
        }

        if sentiment > SENTIMENT_VOTE_THRESHOLD {
            tally.bullish += 1;
        } else if sentiment < -SENTIMENT_VOTE_THRESHOLD {
            tally.bearish += 1;
        }
        tally
    }

    /// One side must lead by at least two votes
    pub fn decide(&self) -> Recommendation {
        if self.bullish > self.bearish + 1 {
            Recommendation::Buy
        } else if self.bearish > self.bullish + 1 {
            Recommendation::Sell
        } else {
            Recommendation::Hold
        }
    }
}

/// Recommendation and its confidence in [0, 100]
pub fn recommend(signals: &SignalSet, sentiment: f64) -> (Recommendation, f64) {
    let recommendation = VoteTally::count(signals, sentiment).decide();
    (recommendation, confidence(signals.len(), sentiment))
}

/// `min(min(n * 15, 60) + |sentiment| * 50, 100)`, one decimal
pub fn confidence(signal_count: usize, sentiment: f64) -> f64 {
    let base = (signal_count as f64 * POINTS_PER_SIGNAL).min(MAX_SIGNAL_POINTS);
    let sentiment = if sentiment.is_finite() {
        sentiment.clamp(-1.0, 1.0).abs()
    } else {
        0.0
    };
    let total = (base + sentiment * SENTIMENT_POINTS).min(MAX_CONFIDENCE);
    (total * 10.0).round() / 10.0
}
