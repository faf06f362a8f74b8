use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::asset::AssetSnapshot;
use crate::models::query::MarketQuery;
use crate::providers::traits::MarketDataProvider;

/// Fetches pages of the market listing.
///
/// Validates the query before touching the network; the caller decides what
/// to do with the result (the dashboard state replaces its list wholesale).
pub struct MarketService {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch one page of asset snapshots for `query`.
    pub async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<AssetSnapshot>, CoreError> {
        query.validate()?;

        match self.provider.fetch_markets(query).await {
            Ok(assets) => {
                tracing::info!(
                    provider = self.provider.name(),
                    currency = %query.currency,
                    order = %query.order,
                    page = query.page,
                    page_size = query.page_size,
                    rows = assets.len(),
                    "market listing fetched"
                );
                Ok(assets)
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    page = query.page,
                    "market listing fetch failed: {e}"
                );
                Err(e)
            }
        }
    }
}
