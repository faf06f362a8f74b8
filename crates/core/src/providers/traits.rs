use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::AssetSnapshot;
use crate::models::history::HistorySeriesSet;
use crate::models::query::{Currency, MarketQuery};

/// Trait abstraction over the upstream market data API.
///
/// The dashboard talks to a single provider (CoinGecko); the trait is the
/// seam where tests substitute a mock without touching the network.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch one page of the market listing.
    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<AssetSnapshot>, CoreError>;

    /// Fetch price, market-cap and volume history for one asset
    /// over the last `days` days.
    async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<HistorySeriesSet, CoreError>;
}
