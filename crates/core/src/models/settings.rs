use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::query::{validate_pagination, Currency, SortOrder};
use crate::errors::CoreError;

/// Default CoinGecko base URL for the `/coins` endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3/coins";

/// How timestamps are turned into display strings.
///
/// A fixed format and offset stand in for the user's locale so that the same
/// timestamp always renders to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayFormat {
    /// chrono strftime pattern for chart timestamps
    pub date_time_format: String,

    /// chrono strftime pattern for calendar dates (all-time high/low)
    pub date_format: String,

    /// Offset from UTC applied before formatting, in seconds
    pub utc_offset_seconds: i32,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            date_time_format: "%-m/%-d/%Y, %-I:%M:%S %p".to_string(),
            date_format: "%a %b %d %Y".to_string(),
            utc_offset_seconds: 0,
        }
    }
}

impl DisplayFormat {
    /// Format an epoch-millisecond timestamp as a date-time string.
    /// Timestamps chrono cannot represent render as the raw number.
    pub fn format_timestamp_ms(&self, timestamp_ms: i64) -> String {
        match DateTime::from_timestamp_millis(timestamp_ms) {
            Some(dt) => self.render(dt, &self.date_time_format),
            None => timestamp_ms.to_string(),
        }
    }

    /// Format a date-time as a calendar date string.
    pub fn format_date(&self, dt: DateTime<Utc>) -> String {
        self.render(dt, &self.date_format)
    }

    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .unwrap_or_else(|| Utc.fix())
    }

    fn render(&self, dt: DateTime<Utc>, pattern: &str) -> String {
        let local = dt.with_timezone(&self.offset());
        let mut out = String::new();
        // A malformed pattern makes Display fail instead of panicking here.
        if write!(out, "{}", local.format(pattern)).is_err() {
            return local.to_rfc3339();
        }
        out
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for pattern in [&self.date_time_format, &self.date_format] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(CoreError::Config(format!(
                    "Invalid date format pattern '{pattern}'"
                )));
            }
        }
        if FixedOffset::east_opt(self.utc_offset_seconds).is_none() {
            return Err(CoreError::Config(format!(
                "UTC offset of {} seconds is out of range",
                self.utc_offset_seconds
            )));
        }
        Ok(())
    }
}

/// Dashboard configuration.
///
/// Every field has a default, so a JSON document only needs the keys it
/// wants to override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the `/coins` API (no trailing slash needed)
    pub api_base_url: String,

    /// Currency selected when the dashboard starts
    pub default_currency: Currency,

    /// Sort order selected when the dashboard starts
    pub default_order: SortOrder,

    /// Rows per page when the dashboard starts
    pub default_page_size: u32,

    /// Lookback window for detail charts, in days
    pub history_days: u32,

    /// Per-request timeout; a hung call fails after this many seconds
    pub request_timeout_secs: u64,

    pub display: DisplayFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_currency: Currency::Usd,
            default_order: SortOrder::MarketCapDesc,
            default_page_size: 10,
            history_days: 30,
            request_timeout_secs: 30,
            display: DisplayFormat::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::Config("api_base_url must not be empty".into()));
        }
        if self.history_days < 1 {
            return Err(CoreError::Config("history_days must be at least 1".into()));
        }
        if self.request_timeout_secs < 1 {
            return Err(CoreError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        validate_pagination(1, self.default_page_size)
            .map_err(|e| CoreError::Config(e.to_string()))?;
        self.display.validate()
    }
}
