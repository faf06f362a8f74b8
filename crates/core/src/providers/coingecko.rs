use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::AssetSnapshot;
use crate::models::history::HistorySeriesSet;
use crate::models::query::{Currency, MarketQuery};
use crate::models::settings::DEFAULT_API_BASE_URL;
use super::traits::MarketDataProvider;

const PROVIDER_NAME: &str = "CoinGecko";

/// CoinGecko public API provider.
///
/// - **Free**: No API key required on the public tier.
/// - **Endpoints**: `/markets`, `/{id}/market_chart` (relative to `/api/v3/coins`)
/// - **Ids**: lowercase slugs like "bitcoin", "ethereum", taken verbatim
///   from the `id` field of the market listing.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL, 30)
    }

    /// Provider against a custom base URL, with a per-request timeout in seconds.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the market listing endpoint (query string excluded).
    pub fn markets_url(&self) -> String {
        format!("{}/markets", self.base_url)
    }

    /// URL of the history endpoint for one asset (query string excluded).
    pub fn market_chart_url(&self, asset_id: &str) -> String {
        format!("{}/{}/market_chart", self.base_url, asset_id)
    }

    /// Query parameters of a market listing request, in request order.
    /// Sparklines are never requested.
    pub fn markets_params(query: &MarketQuery) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", query.currency.as_str().to_string()),
            ("order", query.order.as_str().to_string()),
            ("per_page", query.page_size.to_string()),
            ("page", query.page.to_string()),
            ("sparkline", "false".to_string()),
        ]
    }

    /// Query parameters of a history request, in request order.
    pub fn market_chart_params(currency: Currency, days: u32) -> Vec<(&'static str, String)> {
        vec![
            ("vs_currency", currency.as_str().to_string()),
            ("days", days.to_string()),
        ]
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, CoreError> {
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            CoreError::Deserialization(format!("Unexpected {PROVIDER_NAME} response shape: {e}"))
        })
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<AssetSnapshot>, CoreError> {
        let url = self.markets_url();
        let params = Self::markets_params(query);
        tracing::debug!(%url, ?params, "requesting market listing");
        self.get_json(&url, &params).await
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<HistorySeriesSet, CoreError> {
        let url = self.market_chart_url(asset_id);
        let params = Self::market_chart_params(currency, days);
        tracing::debug!(%url, ?params, "requesting market chart");
        self.get_json(&url, &params).await
    }
}
