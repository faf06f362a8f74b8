pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod state;

use std::collections::VecDeque;
use std::sync::Arc;

use models::{
    asset::AssetSnapshot,
    chart::{ChartDataPoint, DetailTab},
    overview::OverviewStatistic,
    query::{Currency, MarketQuery, SortOrder},
    settings::Settings,
};
use providers::{coingecko::CoinGeckoProvider, traits::MarketDataProvider};
use services::{
    chart_service::ChartService, history_service::HistoryService,
    market_service::MarketService, overview_service::OverviewService,
};
use state::{
    dashboard::{DashboardState, DashboardView},
    request::FetchRequest,
};

use errors::CoreError;

/// Main entry point for the coin dashboard core library.
/// Holds the view state and all services needed to keep it up to date.
///
/// Intent methods return `Err` only for invalid input. Fetch failures are
/// recorded in the state (see `DashboardView::markets_error` and
/// `DashboardView::history_error`) and never abort the dashboard.
#[must_use]
pub struct CoinDashboard {
    settings: Settings,
    state: DashboardState,
    market_service: MarketService,
    history_service: HistoryService,
    chart_service: ChartService,
    overview_service: OverviewService,
}

impl std::fmt::Debug for CoinDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinDashboard")
            .field("provider", &self.market_service.provider_name())
            .field("query", self.state.query())
            .field("assets", &self.state.assets().len())
            .field("selected", &self.state.selected_id())
            .field("tab", &self.state.active_tab())
            .finish()
    }
}

impl CoinDashboard {
    /// Create a dashboard backed by the CoinGecko API.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let provider = CoinGeckoProvider::with_base_url(
            &settings.api_base_url,
            settings.request_timeout_secs,
        );
        Ok(Self::build(settings, Arc::new(provider)))
    }

    /// Create a dashboard backed by a custom provider (tests, proxies).
    pub fn with_provider(
        settings: Settings,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::build(settings, provider))
    }

    // ── Intents ─────────────────────────────────────────────────────

    /// Initial load: fetch the current page unless rows are already held.
    /// Calling it again after a successful load does nothing.
    pub async fn load(&mut self) {
        if !self.state.assets().is_empty() {
            return;
        }
        self.refresh().await;
    }

    /// Re-fetch the current page, replacing whatever is listed.
    pub async fn refresh(&mut self) {
        let requests = self.state.refresh();
        self.run(requests).await;
    }

    pub async fn set_currency(&mut self, currency: Currency) {
        let requests = self.state.set_currency(currency);
        self.run(requests).await;
    }

    pub async fn set_order(&mut self, order: SortOrder) {
        let requests = self.state.set_order(order);
        self.run(requests).await;
    }

    /// Change page and page size together. The page is kept when only the size changes.
    pub async fn set_pagination(&mut self, page: u32, page_size: u32) -> Result<(), CoreError> {
        let requests = self.state.set_pagination(page, page_size)?;
        self.run(requests).await;
        Ok(())
    }

    /// Open the detail view of a listed asset and load its history.
    pub async fn open_asset(&mut self, asset_id: &str) -> Result<(), CoreError> {
        let requests = self.state.open_asset(asset_id)?;
        self.run(requests).await;
        Ok(())
    }

    pub fn close_asset(&mut self) {
        self.state.close_asset();
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.state.select_tab(tab);
    }

    // ── Readers ─────────────────────────────────────────────────────

    #[must_use]
    pub fn view(&self) -> DashboardView<'_> {
        self.state.view(&self.chart_service)
    }

    /// Chart points for the active tab; `None` on the overview tab.
    #[must_use]
    pub fn chart_series(&self) -> Option<Vec<ChartDataPoint>> {
        self.state.chart_series(&self.chart_service)
    }

    /// Caption of the history chart for the configured lookback window.
    #[must_use]
    pub fn chart_caption(&self) -> String {
        ChartService::window_caption(self.settings.history_days)
    }

    /// Overview statistics of the selected asset, if one is open and listed.
    #[must_use]
    pub fn overview(&self) -> Option<Vec<OverviewStatistic>> {
        let asset = self.state.selected_asset()?;
        Some(
            self.overview_service
                .statistics(asset, self.state.query().currency),
        )
    }

    #[must_use]
    pub fn selected_asset(&self) -> Option<&AssetSnapshot> {
        self.state.selected_asset()
    }

    #[must_use]
    pub fn query(&self) -> &MarketQuery {
        self.state.query()
    }

    #[must_use]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Perform issued fetches in order and feed each result back.
    /// A new list may bring the selected asset back, which queues its history.
    async fn run(&mut self, requests: Vec<FetchRequest>) {
        let mut queue = VecDeque::from(requests);
        while let Some(request) = queue.pop_front() {
            match request {
                FetchRequest::Markets { id, query } => {
                    let result = self.market_service.fetch_markets(&query).await;
                    if self.state.complete_markets(id, result) {
                        queue.extend(self.state.resume_history());
                    }
                }
                FetchRequest::History {
                    id,
                    asset_id,
                    currency,
                    days,
                } => {
                    let result = self
                        .history_service
                        .fetch_history(&asset_id, currency, days)
                        .await;
                    self.state.complete_history(id, result);
                }
            }
        }
    }

    fn build(settings: Settings, provider: Arc<dyn MarketDataProvider>) -> Self {
        let state = DashboardState::from_settings(&settings);
        let market_service = MarketService::new(Arc::clone(&provider));
        let history_service = HistoryService::new(provider);
        let chart_service = ChartService::new(settings.display.clone());
        let overview_service = OverviewService::new(settings.display.clone());

        Self {
            settings,
            state,
            market_service,
            history_service,
            chart_service,
            overview_service,
        }
    }
}
