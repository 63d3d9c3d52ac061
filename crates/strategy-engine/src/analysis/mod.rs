//! Pure, synchronous signal fusion
//!
//! price bars -> [`indicators`] -> [`signals`] -> (+ [`sentiment`]) ->
//! [`recommendation`] -> [`risk`]. Nothing in here performs I/O.

pub mod indicators;
pub mod recommendation;
pub mod risk;
pub mod sentiment;
pub mod signals;

pub use indicators::{Indicator, IndicatorSeries, IndicatorSettings, IndicatorSnapshot};
pub use recommendation::{Recommendation, VoteTally, confidence, recommend};
pub use risk::{EntryPoints, PriceLevels, RiskMetrics};
pub use sentiment::aggregate as aggregate_sentiment;
pub use signals::{Bias, MIN_SIGNAL_BARS, SignalCategory, SignalLabel, SignalSet, classify};

#[cfg(test)]
pub(crate) mod fixtures {
    /// 50-bar random walk whose TA-Lib MACD crosses above its signal on the last bar
    pub(crate) const RANDOM_WALK: [f64; 50] = [
        100.0, 99.13, 97.76, 98.72, 100.45, 99.32, 97.94, 99.22, 98.98, 100.75, 100.94, 102.5,
        102.91, 104.8, 105.32, 104.86, 105.13, 106.13, 107.69, 108.3, 107.29, 105.9, 105.14,
        104.38, 105.93, 104.15, 105.25, 104.38, 105.02, 103.44, 104.14, 104.86, 102.87, 103.06,
        104.15, 103.19, 102.39, 103.93, 102.72, 104.41, 106.31, 105.93, 104.64, 103.25, 102.36,
        102.18, 104.06, 104.07, 105.48, 106.61,
    ];
}
