use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::history::SeriesKind;
use crate::errors::CoreError;

/// A single data point for chart rendering.
///
/// The date is already formatted; a renderer plots `value` against `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    /// Display-formatted date-time of the sample
    pub date: String,

    /// Sample value, unchanged from the provider
    pub value: f64,
}

/// The four views of the asset detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DetailTab {
    /// Static statistics of the selected snapshot
    #[default]
    Overview,
    Prices,
    MarketCaps,
    TotalVolumes,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [
        DetailTab::Overview,
        DetailTab::Prices,
        DetailTab::MarketCaps,
        DetailTab::TotalVolumes,
    ];

    /// The history series this tab charts, or `None` for the overview.
    pub fn series_kind(&self) -> Option<SeriesKind> {
        match self {
            DetailTab::Overview => None,
            DetailTab::Prices => Some(SeriesKind::Prices),
            DetailTab::MarketCaps => Some(SeriesKind::MarketCaps),
            DetailTab::TotalVolumes => Some(SeriesKind::TotalVolumes),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Prices => "Prices",
            DetailTab::MarketCaps => "Market Caps",
            DetailTab::TotalVolumes => "Total Volumes",
        }
    }

    /// Stable key for tab widgets ("0".."3").
    pub fn key(&self) -> &'static str {
        match self {
            DetailTab::Overview => "0",
            DetailTab::Prices => "1",
            DetailTab::MarketCaps => "2",
            DetailTab::TotalVolumes => "3",
        }
    }
}

impl FromStr for DetailTab {
    type Err = CoreError;

    /// Accepts a tab key ("0".."3").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DetailTab::ALL
            .into_iter()
            .find(|t| t.key() == s.trim())
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown detail tab key '{s}'")))
    }
}
