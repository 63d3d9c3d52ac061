//! Price bars and history periods

use crate::error::{Result, StrategyError};
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One OHLCV bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Bar whose open, high, low and close all equal `close`
    pub fn flat(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}

/// Closing prices of a bar sequence, in order
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|bar| bar.close).collect()
}

/// Look-back window for price history requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HistoryPeriod {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl HistoryPeriod {
    /// Short code, e.g. `"6mo"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::YearToDate => "ytd",
            Self::Max => "max",
        }
    }

    /// First instant covered when the window ends at `end`
    pub fn start_from(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::OneDay => end - Duration::days(1),
            Self::FiveDays => end - Duration::days(5),
            Self::OneMonth => end - Duration::days(30),
            Self::ThreeMonths => end - Duration::days(90),
            Self::SixMonths => end - Duration::days(180),
            Self::OneYear => end - Duration::days(365),
            Self::TwoYears => end - Duration::days(730),
            Self::FiveYears => end - Duration::days(1825),
            Self::TenYears => end - Duration::days(3650),
            Self::YearToDate => chrono::NaiveDate::from_ymd_opt(end.year(), 1, 1)
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map_or(end - Duration::days(365), |start| start.and_utc()),
            // ~100 years
            Self::Max => end - Duration::days(36500),
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryPeriod {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Ok(Self::OneDay),
            "5d" => Ok(Self::FiveDays),
            "1mo" => Ok(Self::OneMonth),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "ytd" => Ok(Self::YearToDate),
            "max" => Ok(Self::Max),
            other => Err(StrategyError::InvalidPeriod(other.to_string())),
        }
    }
}

impl TryFrom<String> for HistoryPeriod {
    type Error = StrategyError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HistoryPeriod> for String {
    fn from(period: HistoryPeriod) -> Self {
        period.as_str().to_string()
    }
}
