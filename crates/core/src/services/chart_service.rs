use crate::models::chart::{ChartDataPoint, DetailTab};
use crate::models::history::{HistoryPoint, HistorySeriesSet};
use crate::models::settings::DisplayFormat;

/// Generates chart-ready series from asset history.
///
/// All numbers and labels are computed here; renderers only draw them.
/// Projection is pure: the same (tab, history) pair always yields the same
/// points, and the output has exactly one point per input sample.
pub struct ChartService {
    format: DisplayFormat,
}

impl ChartService {
    pub fn new(format: DisplayFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &DisplayFormat {
        &self.format
    }

    /// Project the series matching `tab`.
    ///
    /// Returns `None` for the overview tab, which shows snapshot fields
    /// instead of a chart. An empty series projects to an empty vector.
    pub fn project(&self, tab: DetailTab, history: &HistorySeriesSet) -> Option<Vec<ChartDataPoint>> {
        let kind = tab.series_kind()?;
        Some(self.project_points(history.series(kind)))
    }

    /// Map raw samples to display records; values pass through unchanged.
    pub fn project_points(&self, points: &[HistoryPoint]) -> Vec<ChartDataPoint> {
        points
            .iter()
            .map(|p| ChartDataPoint {
                date: self.format.format_timestamp_ms(p.timestamp_ms),
                value: p.value,
            })
            .collect()
    }

    /// Caption shown above the chart (e.g., "Time Interval - last 30 days").
    pub fn window_caption(days: u32) -> String {
        if days == 1 {
            "Time Interval - last 1 day".to_string()
        } else {
            format!("Time Interval - last {days} days")
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(DisplayFormat::default())
    }
}
