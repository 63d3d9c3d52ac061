//! Technical indicator series derived from closing prices
//!
//! Every series is aligned index-for-index with the input closes. Entries
//! inside an indicator's warm-up window are `None`; a value at index `i`
//! only ever depends on closes `0..=i`.

use serde::{Deserialize, Serialize};
use ta::{
    Next,
    indicators::{BollingerBands, ExponentialMovingAverage, SimpleMovingAverage},
};

use crate::error::{Result, StrategyError};

/// Indicator windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub sma_fast: usize,
    pub sma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
        }
    }
}

impl IndicatorSettings {
    /// Reject zero windows and inverted fast/slow pairs
    pub fn validate(&self) -> Result<()> {
        let windows = [
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("bollinger_period", self.bollinger_period),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, period)| *period == 0) {
            return Err(StrategyError::IndicatorError(format!(
                "{name} must be greater than 0"
            )));
        }
        if self.sma_fast >= self.sma_slow {
            return Err(StrategyError::IndicatorError(
                "sma_fast must be shorter than sma_slow".to_string(),
            ));
        }
        if self.macd_fast >= self.macd_slow {
            return Err(StrategyError::IndicatorError(
                "macd_fast must be shorter than macd_slow".to_string(),
            ));
        }
        if !(self.bollinger_std_dev.is_finite() && self.bollinger_std_dev > 0.0) {
            return Err(StrategyError::IndicatorError(
                "bollinger_std_dev must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Names of the computed series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    SmaFast,
    SmaSlow,
    Rsi,
    Macd,
    MacdSignal,
    MacdHistogram,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
}

impl Indicator {
    pub const ALL: [Indicator; 9] = [
        Self::SmaFast,
        Self::SmaSlow,
        Self::Rsi,
        Self::Macd,
        Self::MacdSignal,
        Self::MacdHistogram,
        Self::BollingerUpper,
        Self::BollingerMiddle,
        Self::BollingerLower,
    ];
}

/// Indicator values at one bar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
}

/// Aligned indicator series for one price history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    closes: Vec<f64>,
    sma_fast: Vec<Option<f64>>,
    sma_slow: Vec<Option<f64>>,
    rsi: Vec<Option<f64>>,
    macd: Vec<Option<f64>>,
    macd_signal: Vec<Option<f64>>,
    macd_histogram: Vec<Option<f64>>,
    bollinger_upper: Vec<Option<f64>>,
    bollinger_middle: Vec<Option<f64>>,
    bollinger_lower: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Compute all series; short inputs only widen the `None` prefix
    pub fn compute(closes: &[f64], settings: &IndicatorSettings) -> Result<Self> {
        settings.validate()?;

        let (macd, macd_signal, macd_histogram) = macd(
            closes,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        )?;
        let (bollinger_upper, bollinger_middle, bollinger_lower) = bollinger(
            closes,
            settings.bollinger_period,
            settings.bollinger_std_dev,
        )?;

        Ok(Self {
            closes: closes.to_vec(),
            sma_fast: sma(closes, settings.sma_fast)?,
            sma_slow: sma(closes, settings.sma_slow)?,
            rsi: wilder_rsi(closes, settings.rsi_period),
            macd,
            macd_signal,
            macd_histogram,
            bollinger_upper,
            bollinger_middle,
            bollinger_lower,
        })
    }

    /// Number of bars covered
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Full series for one indicator
    pub fn series(&self, indicator: Indicator) -> &[Option<f64>] {
        match indicator {
            Indicator::SmaFast => &self.sma_fast,
            Indicator::SmaSlow => &self.sma_slow,
            Indicator::Rsi => &self.rsi,
            Indicator::Macd => &self.macd,
            Indicator::MacdSignal => &self.macd_signal,
            Indicator::MacdHistogram => &self.macd_histogram,
            Indicator::BollingerUpper => &self.bollinger_upper,
            Indicator::BollingerMiddle => &self.bollinger_middle,
            Indicator::BollingerLower => &self.bollinger_lower,
        }
    }

    /// Value of `indicator` at bar `index`, `None` when out of range or warming up
    pub fn value(&self, indicator: Indicator, index: usize) -> Option<f64> {
        self.series(indicator).get(index).copied().flatten()
    }

    /// Most recent defined value of `indicator`
    pub fn latest(&self, indicator: Indicator) -> Option<f64> {
        self.series(indicator).last().copied().flatten()
    }

    /// All values needed by the signal classifier at bar `index`
    pub fn snapshot(&self, index: usize) -> Option<IndicatorSnapshot> {
        let close = *self.closes.get(index)?;
        Some(IndicatorSnapshot {
            close,
            sma_fast: self.value(Indicator::SmaFast, index),
            sma_slow: self.value(Indicator::SmaSlow, index),
            rsi: self.value(Indicator::Rsi, index),
            macd: self.value(Indicator::Macd, index),
            macd_signal: self.value(Indicator::MacdSignal, index),
            bollinger_upper: self.value(Indicator::BollingerUpper, index),
            bollinger_lower: self.value(Indicator::BollingerLower, index),
        })
    }
}

/// Simple moving average, `None` for the first `period - 1` bars
fn sma(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut indicator = SimpleMovingAverage::new(period)?;
    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = indicator.next(close);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}

/// Exponential moving average seeded with the SMA of `values[start..start + period]`
///
/// The seed lands at index `start + period - 1`; everything before it is `None`.
fn seeded_ema(values: &[f64], period: usize, start: usize) -> Result<Vec<Option<f64>>> {
    let mut out = vec![None; values.len()];
    let seed_end = start + period;
    if values.len() < seed_end {
        return Ok(out);
    }

    // ta's EMA adopts its first input as-is, so feeding the SMA seeds it
    let mut indicator = ExponentialMovingAverage::new(period)?;
    let seed = values[start..seed_end].iter().sum::<f64>() / period as f64;
    out[seed_end - 1] = Some(indicator.next(seed));
    for (i, &value) in values.iter().enumerate().skip(seed_end) {
        out[i] = Some(indicator.next(value));
    }
    Ok(out)
}

type TripleSeries = (Vec<Option<f64>>, Vec<Option<f64>>, Vec<Option<f64>>);

/// MACD line, signal line and histogram, TA-Lib style
///
/// Both price EMAs start at index `slow - 1`: the slow one seeded over the
/// first `slow` closes, the fast one over the `fast` closes ending there.
/// The signal EMA is seeded with the SMA of the first `signal` MACD values,
/// and all three outputs are defined from index `slow + signal - 2`.
fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> Result<TripleSeries> {
    let first_macd = slow - 1;
    let slow_ema = seeded_ema(closes, slow, 0)?;
    let fast_ema = seeded_ema(closes, fast, slow - fast)?;

    let raw: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .skip(first_macd)
        .filter_map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let smoothed = seeded_ema(&raw, signal, 0)?;

    let mut line = vec![None; closes.len()];
    let mut signal_line = vec![None; closes.len()];
    let mut histogram = vec![None; closes.len()];

    for (offset, (&macd_value, signal_value)) in raw.iter().zip(&smoothed).enumerate() {
        let Some(signal_value) = *signal_value else {
            continue;
        };
        let i = first_macd + offset;
        line[i] = Some(macd_value);
        signal_line[i] = Some(signal_value);
        histogram[i] = Some(macd_value - signal_value);
    }

    Ok((line, signal_line, histogram))
}

/// Upper, middle and lower Bollinger bands (population standard deviation)
fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Result<TripleSeries> {
    let mut indicator = BollingerBands::new(period, std_dev)?;
    let mut upper = Vec::with_capacity(closes.len());
    let mut middle = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for (i, &close) in closes.iter().enumerate() {
        let bands = indicator.next(close);
        let ready = i + 1 >= period;
        upper.push(ready.then_some(bands.upper));
        middle.push(ready.then_some(bands.average));
        lower.push(ready.then_some(bands.lower));
    }

    Ok((upper, middle, lower))
}

/// Wilder RSI
///
/// Averages are seeded with the mean gain/loss of the first `period` changes,
/// so the first value lands at index `period`.
fn wilder_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 { (g + d, l) } else { (g, l - d) }
        });
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;
    out[period] = rsi_from_averages(avg_gain, avg_loss);

    for (offset, &delta) in deltas[period..].iter().enumerate() {
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;
        // delta k connects closes k and k + 1
        out[period + offset + 1] = rsi_from_averages(avg_gain, avg_loss);
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_gain == 0.0 && avg_loss == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    rsi.is_finite().then_some(rsi)
}
