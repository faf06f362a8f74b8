use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::history::HistorySeriesSet;
use crate::models::query::Currency;
use crate::providers::traits::MarketDataProvider;

/// Fetches the price / market-cap / volume history of a single asset.
pub struct HistoryService {
    provider: Arc<dyn MarketDataProvider>,
}

impl HistoryService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the three history series of `asset_id` over the last `days` days.
    ///
    /// The id becomes a URL path segment, so it must be a plain slug.
    pub async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<HistorySeriesSet, CoreError> {
        validate_asset_id(asset_id)?;
        if days < 1 {
            return Err(CoreError::ValidationError(
                "Lookback window must be at least 1 day".into(),
            ));
        }

        match self.provider.fetch_history(asset_id, currency, days).await {
            Ok(history) => {
                tracing::info!(
                    provider = self.provider.name(),
                    asset_id,
                    currency = %currency,
                    days,
                    prices = history.prices.len(),
                    market_caps = history.market_caps.len(),
                    total_volumes = history.total_volumes.len(),
                    "asset history fetched"
                );
                Ok(history)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    asset_id,
                    "asset history fetch failed: {e}"
                );
                Err(e)
            }
        }
    }
}

fn validate_asset_id(asset_id: &str) -> Result<(), CoreError> {
    if asset_id.is_empty() {
        return Err(CoreError::ValidationError("Asset id must not be empty".into()));
    }
    if asset_id
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(CoreError::ValidationError(format!(
            "Asset id '{asset_id}' contains characters not allowed in a path segment"
        )));
    }
    Ok(())
}
