use serde::{Deserialize, Serialize};

/// Value cell of an overview statistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatValue {
    Number(f64),
    Text(String),
    /// Provider sent no value
    Missing,
}

impl From<Option<f64>> for StatValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(StatValue::Missing, StatValue::Number)
    }
}

/// One labelled figure on the overview tab (e.g., "Market Cap" … "USD").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewStatistic {
    pub title: String,
    pub value: StatValue,
    pub suffix: Option<String>,
}

impl OverviewStatistic {
    pub fn new(title: impl Into<String>, value: StatValue, suffix: Option<&str>) -> Self {
        Self {
            title: title.into(),
            value,
            suffix: suffix.map(str::to_string),
        }
    }
}
