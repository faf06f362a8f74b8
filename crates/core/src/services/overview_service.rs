use chrono::{DateTime, Utc};

use crate::models::asset::AssetSnapshot;
use crate::models::overview::{OverviewStatistic, StatValue};
use crate::models::query::Currency;
use crate::models::settings::DisplayFormat;

/// Builds the statistics grid of the overview tab from a snapshot.
///
/// Money figures carry the currency label as suffix, percentages carry `%`,
/// all-time high/low dates are rendered as calendar dates.
pub struct OverviewService {
    format: DisplayFormat,
}

impl OverviewService {
    pub fn new(format: DisplayFormat) -> Self {
        Self { format }
    }

    pub fn statistics(&self, asset: &AssetSnapshot, currency: Currency) -> Vec<OverviewStatistic> {
        let money = Some(currency.label());
        let percent = Some("%");

        vec![
            OverviewStatistic::new("Current Price", asset.current_price.into(), money),
            OverviewStatistic::new("Market Cap", asset.market_cap.into(), money),
            OverviewStatistic::new(
                "Market Cap Rank",
                asset.market_cap_rank.map(f64::from).into(),
                None,
            ),
            OverviewStatistic::new("Total Volume", asset.total_volume.into(), money),
            OverviewStatistic::new("High 24 Hours", asset.high_24h.into(), money),
            OverviewStatistic::new("Low 24 Hours", asset.low_24h.into(), money),
            OverviewStatistic::new("Price Change 24 Hours", asset.price_change_24h.into(), money),
            OverviewStatistic::new(
                "Price Change Percentage 24 Hours",
                asset.price_change_percentage_24h.into(),
                percent,
            ),
            OverviewStatistic::new("All Time High", asset.ath.into(), money),
            OverviewStatistic::new("All Time High Date", self.date_value(asset.ath_date), None),
            OverviewStatistic::new(
                "All Time High Change",
                asset.ath_change_percentage.into(),
                percent,
            ),
            OverviewStatistic::new("Total Supply", asset.total_supply.into(), None),
            OverviewStatistic::new("All Time Low", asset.atl.into(), money),
            OverviewStatistic::new("All Time Low Date", self.date_value(asset.atl_date), None),
            OverviewStatistic::new(
                "All Time Low Change",
                asset.atl_change_percentage.into(),
                percent,
            ),
            OverviewStatistic::new("Max Supply", asset.max_supply.into(), None),
        ]
    }

    fn date_value(&self, date: Option<DateTime<Utc>>) -> StatValue {
        date.map_or(StatValue::Missing, |d| StatValue::Text(self.format.format_date(d)))
    }
}

impl Default for OverviewService {
    fn default() -> Self {
        Self::new(DisplayFormat::default())
    }
}
