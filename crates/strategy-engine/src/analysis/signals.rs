//! Categorical technical signals from the latest two bars

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::indicators::{IndicatorSeries, IndicatorSnapshot};

/// Bars required before any signal is emitted
pub const MIN_SIGNAL_BARS: usize = 50;

/// RSI thresholds
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Indicator family a signal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalCategory {
    Rsi,
    Macd,
    Ma,
    Bb,
}

/// Label assigned to a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalLabel {
    Oversold,
    Overbought,
    Neutral,
    BullishCrossover,
    BearishCrossover,
    BullishTrend,
    BearishTrend,
    Mixed,
}

/// Direction a label votes for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalLabel {
    pub fn bias(&self) -> Bias {
        match self {
            Self::Oversold | Self::BullishCrossover | Self::BullishTrend => Bias::Bullish,
            Self::Overbought | Self::BearishCrossover | Self::BearishTrend => Bias::Bearish,
            Self::Neutral | Self::Mixed => Bias::Neutral,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oversold => "oversold",
            Self::Overbought => "overbought",
            Self::Neutral => "neutral",
            Self::BullishCrossover => "bullish_crossover",
            Self::BearishCrossover => "bearish_crossover",
            Self::BullishTrend => "bullish_trend",
            Self::BearishTrend => "bearish_trend",
            Self::Mixed => "mixed",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::Ma => "ma",
            Self::Bb => "bb",
        })
    }
}

/// One label per category, or nothing at all when history is too short
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalSet(BTreeMap<SignalCategory, SignalLabel>);

impl SignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: SignalCategory) -> Option<SignalLabel> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalCategory, SignalLabel)> + '_ {
        self.0.iter().map(|(c, l)| (*c, *l))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, category: SignalCategory, label: Option<SignalLabel>) {
        if let Some(label) = label {
            self.0.insert(category, label);
        }
    }
}

impl FromIterator<(SignalCategory, SignalLabel)> for SignalSet {
    fn from_iter<T: IntoIterator<Item = (SignalCategory, SignalLabel)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Classify the latest bar against the one before it
///
/// Returns an empty set when fewer than `min_bars` bars exist. A category
/// whose inputs are undefined is left out.
pub fn classify(series: &IndicatorSeries, min_bars: usize) -> SignalSet {
    let mut signals = SignalSet::new();
    if series.len() < min_bars.max(2) {
        return signals;
    }

    let last = series.len() - 1;
    let (Some(latest), Some(previous)) = (series.snapshot(last), series.snapshot(last - 1)) else {
        return signals;
    };

    signals.set(SignalCategory::Rsi, rsi_signal(&latest));
    signals.set(SignalCategory::Macd, macd_signal(&latest, &previous));
    signals.set(SignalCategory::Ma, trend_signal(&latest));
    signals.set(SignalCategory::Bb, band_signal(&latest));
    signals
}

fn rsi_signal(latest: &IndicatorSnapshot) -> Option<SignalLabel> {
    let rsi = latest.rsi?;
    Some(if rsi < RSI_OVERSOLD {
        SignalLabel::Oversold
    } else if rsi > RSI_OVERBOUGHT {
        SignalLabel::Overbought
    } else {
        SignalLabel::Neutral
    })
}

fn macd_signal(latest: &IndicatorSnapshot, previous: &IndicatorSnapshot) -> Option<SignalLabel> {
    let (l_macd, l_signal) = (latest.macd?, latest.macd_signal?);
    let (p_macd, p_signal) = (previous.macd?, previous.macd_signal?);

    Some(if l_macd > l_signal && p_macd <= p_signal {
        SignalLabel::BullishCrossover
    } else if l_macd < l_signal && p_macd >= p_signal {
        SignalLabel::BearishCrossover
    } else {
        SignalLabel::Neutral
    })
}

fn trend_signal(latest: &IndicatorSnapshot) -> Option<SignalLabel> {
    let (fast, slow) = (latest.sma_fast?, latest.sma_slow?);
    let close = latest.close;

    Some(if close > fast && fast > slow {
        SignalLabel::BullishTrend
    } else if close < fast && fast < slow {
        SignalLabel::BearishTrend
    } else {
        SignalLabel::Mixed
    })
}

fn band_signal(latest: &IndicatorSnapshot) -> Option<SignalLabel> {
    let (upper, lower) = (latest.bollinger_upper?, latest.bollinger_lower?);

    Some(if latest.close < lower {
        SignalLabel::Oversold
    } else if latest.close > upper {
        SignalLabel::Overbought
    } else {
        SignalLabel::Neutral
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::RANDOM_WALK;
    use crate::analysis::indicators::IndicatorSettings;

    fn snapshot(close: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            close,
            ..Default::default()
        }
    }

    #[test]
    fn test_rsi_boundaries() {
        let at = |rsi: f64| {
            rsi_signal(&IndicatorSnapshot {
                rsi: Some(rsi),
                ..snapshot(100.0)
            })
        };
        assert_eq!(at(30.0), Some(SignalLabel::Neutral));
        assert_eq!(at(29.99), Some(SignalLabel::Oversold));
        assert_eq!(at(70.0), Some(SignalLabel::Neutral));
        assert_eq!(at(70.01), Some(SignalLabel::Overbought));
        assert_eq!(rsi_signal(&snapshot(100.0)), None);
    }

    #[test]
    fn test_macd_crossovers() {
        let bar = |macd: f64, signal: f64| IndicatorSnapshot {
            macd: Some(macd),
            macd_signal: Some(signal),
            ..snapshot(100.0)
        };

        assert_eq!(
            macd_signal(&bar(1.0, 0.5), &bar(0.5, 0.5)),
            Some(SignalLabel::BullishCrossover)
        );
        assert_eq!(
            macd_signal(&bar(0.4, 0.5), &bar(0.5, 0.5)),
            Some(SignalLabel::BearishCrossover)
        );
        // already above, no cross
        assert_eq!(
            macd_signal(&bar(1.0, 0.5), &bar(0.9, 0.5)),
            Some(SignalLabel::Neutral)
        );
        assert_eq!(
            macd_signal(&bar(0.5, 0.5), &bar(0.4, 0.5)),
            Some(SignalLabel::Neutral)
        );
        assert_eq!(macd_signal(&bar(1.0, 0.5), &snapshot(100.0)), None);
    }

    #[test]
    fn test_trend_requires_strict_ordering() {
        let bar = |close: f64, fast: f64, slow: f64| IndicatorSnapshot {
            sma_fast: Some(fast),
            sma_slow: Some(slow),
            ..snapshot(close)
        };

        assert_eq!(trend_signal(&bar(110.0, 105.0, 100.0)), Some(SignalLabel::BullishTrend));
        assert_eq!(trend_signal(&bar(90.0, 95.0, 100.0)), Some(SignalLabel::BearishTrend));
        assert_eq!(trend_signal(&bar(105.0, 105.0, 100.0)), Some(SignalLabel::Mixed));
        assert_eq!(trend_signal(&bar(110.0, 100.0, 105.0)), Some(SignalLabel::Mixed));
    }

    #[test]
    fn test_band_signal() {
        let bar = |close: f64| IndicatorSnapshot {
            bollinger_upper: Some(110.0),
            bollinger_lower: Some(90.0),
            ..snapshot(close)
        };

        assert_eq!(band_signal(&bar(89.0)), Some(SignalLabel::Oversold));
        assert_eq!(band_signal(&bar(111.0)), Some(SignalLabel::Overbought));
        assert_eq!(band_signal(&bar(90.0)), Some(SignalLabel::Neutral));
    }

    #[test]
    fn test_insufficient_history_is_empty() {
        let closes: Vec<f64> = (1..=49).map(f64::from).collect();
        let series = IndicatorSeries::compute(&closes, &IndicatorSettings::default()).unwrap();
        assert!(classify(&series, MIN_SIGNAL_BARS).is_empty());
    }

    #[test]
    fn test_full_signal_set_on_uptrend() {
        let closes: Vec<f64> = (1..=60).map(f64::from).collect();
        let series = IndicatorSeries::compute(&closes, &IndicatorSettings::default()).unwrap();
        let signals = classify(&series, MIN_SIGNAL_BARS);

        assert_eq!(signals.len(), 4);
        assert_eq!(signals.get(SignalCategory::Rsi), Some(SignalLabel::Overbought));
        assert_eq!(signals.get(SignalCategory::Ma), Some(SignalLabel::BullishTrend));
        assert!(signals.get(SignalCategory::Macd).is_some());
        // a linear ramp stays inside its own bands
        assert_eq!(signals.get(SignalCategory::Bb), Some(SignalLabel::Neutral));
    }

    #[test]
    fn test_macd_crossover_on_last_bar() {
        let series = IndicatorSeries::compute(&RANDOM_WALK, &IndicatorSettings::default()).unwrap();
        let signals = classify(&series, MIN_SIGNAL_BARS);

        assert_eq!(signals.len(), 4);
        assert_eq!(
            signals.get(SignalCategory::Macd),
            Some(SignalLabel::BullishCrossover)
        );
    }

    #[test]
    fn test_undefined_categories_are_omitted() {
        let series =
            IndicatorSeries::compute(&RANDOM_WALK[..30], &IndicatorSettings::default()).unwrap();
        let signals = classify(&series, 20);

        // RSI and bands are warm by bar 30, the 50-bar SMA and the MACD signal are not
        assert!(signals.get(SignalCategory::Rsi).is_some());
        assert!(signals.get(SignalCategory::Bb).is_some());
        assert_eq!(signals.get(SignalCategory::Ma), None);
        assert_eq!(signals.get(SignalCategory::Macd), None);
        assert_eq!(signals.len(), 2);
    }

    #[test]
    fn test_signal_set_serializes_as_map() {
        let signals: SignalSet = [
            (SignalCategory::Rsi, SignalLabel::Oversold),
            (SignalCategory::Macd, SignalLabel::BullishCrossover),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&signals).unwrap();
        assert_eq!(json["rsi"], "oversold");
        assert_eq!(json["macd"], "bullish_crossover");
    }
}
