use serde::{Deserialize, Serialize};

/// A single (epoch-millisecond timestamp, value) sample.
///
/// The provider encodes each sample as a two-element JSON array
/// `[timestampMs, value]`; this type reads and writes that shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct HistoryPoint {
    pub timestamp_ms: i64,
    pub value: f64,
}

impl HistoryPoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self { timestamp_ms, value }
    }
}

impl From<(i64, f64)> for HistoryPoint {
    fn from((timestamp_ms, value): (i64, f64)) -> Self {
        Self { timestamp_ms, value }
    }
}

impl From<HistoryPoint> for (i64, f64) {
    fn from(p: HistoryPoint) -> Self {
        (p.timestamp_ms, p.value)
    }
}

/// Which of the three history series to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Prices,
    MarketCaps,
    TotalVolumes,
}

/// Price, market-cap and volume series over the lookback window,
/// as returned by `/{id}/market_chart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeriesSet {
    #[serde(default)]
    pub prices: Vec<HistoryPoint>,

    #[serde(default)]
    pub market_caps: Vec<HistoryPoint>,

    #[serde(default)]
    pub total_volumes: Vec<HistoryPoint>,
}

impl HistorySeriesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, kind: SeriesKind) -> &[HistoryPoint] {
        match kind {
            SeriesKind::Prices => &self.prices,
            SeriesKind::MarketCaps => &self.market_caps,
            SeriesKind::TotalVolumes => &self.total_volumes,
        }
    }

    /// True when no series holds any sample.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.market_caps.is_empty() && self.total_volumes.is_empty()
    }
}
