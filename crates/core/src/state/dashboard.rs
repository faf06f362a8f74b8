use crate::errors::CoreError;
use crate::models::asset::{find_by_id, AssetSnapshot};
use crate::models::chart::{ChartDataPoint, DetailTab};
use crate::models::history::HistorySeriesSet;
use crate::models::query::{validate_pagination, Currency, MarketQuery, SortOrder};
use crate::models::settings::Settings;
use crate::services::chart_service::ChartService;

use super::request::{FetchFailure, FetchKind, FetchRequest, RequestId, SequenceTracker};

static EMPTY_HISTORY: HistorySeriesSet = HistorySeriesSet {
    prices: Vec::new(),
    market_caps: Vec::new(),
    total_volumes: Vec::new(),
};

/// Single container for all dashboard view state.
///
/// State changes only through the intent handlers below. Handlers that need
/// data return the `FetchRequest`s to perform; results come back through
/// `complete_markets` / `complete_history`, which drop anything but the
/// latest request of each kind.
///
/// | intent                  | market fetch        | history fetch                         |
/// |-------------------------|---------------------|---------------------------------------|
/// | `set_currency`          | if changed          | if changed and an asset is selected   |
/// | `set_order`             | if changed          | -                                     |
/// | `set_pagination`        | if either changed   | -                                     |
/// | `open_asset`            | -                   | unless already loaded for that asset  |
/// | `close_asset`           | -                   | in-flight result is discarded         |
/// | `select_tab`            | -                   | -                                     |
/// | `refresh`               | always              | -                                     |
/// | `resume_history`        | -                   | if selection listed and history stale |
#[derive(Debug, Clone)]
pub struct DashboardState {
    query: MarketQuery,
    history_days: u32,

    assets: Vec<AssetSnapshot>,
    loading: bool,
    markets_error: Option<FetchFailure>,
    markets_seq: SequenceTracker,

    selected_id: Option<String>,
    tab: DetailTab,

    history: HistorySeriesSet,
    /// (asset id, currency) the stored or pending history belongs to
    history_key: Option<(String, Currency)>,
    history_loading: bool,
    history_error: Option<FetchFailure>,
    history_seq: SequenceTracker,
}

impl DashboardState {
    pub fn new(query: MarketQuery, history_days: u32) -> Self {
        Self {
            query,
            history_days,
            assets: Vec::new(),
            loading: false,
            markets_error: None,
            markets_seq: SequenceTracker::default(),
            selected_id: None,
            tab: DetailTab::Overview,
            history: HistorySeriesSet::new(),
            history_key: None,
            history_loading: false,
            history_error: None,
            history_seq: SequenceTracker::default(),
        }
    }

    /// State seeded with the configured defaults (page 1).
    pub fn from_settings(settings: &Settings) -> Self {
        let query = MarketQuery::new(
            settings.default_currency,
            settings.default_order,
            1,
            settings.default_page_size,
        );
        Self::new(query, settings.history_days)
    }

    // ── Intents ─────────────────────────────────────────────────────

    /// Re-fetch the current page (also used for the initial load).
    pub fn refresh(&mut self) -> Vec<FetchRequest> {
        vec![self.issue_markets()]
    }

    pub fn set_currency(&mut self, currency: Currency) -> Vec<FetchRequest> {
        if self.query.currency == currency {
            return Vec::new();
        }
        self.query.currency = currency;

        let mut requests = vec![self.issue_markets()];
        if let Some(id) = self.selected_asset().map(|a| a.id.clone()) {
            requests.push(self.issue_history(id));
        } else if self.selected_id.is_some() {
            // Selected row is off the current page: nothing to refetch yet,
            // so drop the old-currency series until `resume_history`.
            self.clear_history();
        }
        requests
    }

    pub fn set_order(&mut self, order: SortOrder) -> Vec<FetchRequest> {
        if self.query.order == order {
            return Vec::new();
        }
        self.query.order = order;
        vec![self.issue_markets()]
    }

    /// Change page and page size together, as a pagination widget reports them.
    /// A new page size does not reset the page number.
    pub fn set_pagination(&mut self, page: u32, page_size: u32) -> Result<Vec<FetchRequest>, CoreError> {
        validate_pagination(page, page_size)?;
        if self.query.page == page && self.query.page_size == page_size {
            return Ok(Vec::new());
        }
        self.query.page = page;
        self.query.page_size = page_size;
        Ok(vec![self.issue_markets()])
    }

    pub fn set_page(&mut self, page: u32) -> Result<Vec<FetchRequest>, CoreError> {
        self.set_pagination(page, self.query.page_size)
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<Vec<FetchRequest>, CoreError> {
        self.set_pagination(self.query.page, page_size)
    }

    /// Open the detail view of an asset in the current list.
    ///
    /// Always resets the tab to the overview. Re-opening the asset whose
    /// history is already loaded (or loading) issues no fetch; a previous
    /// failure is retried.
    pub fn open_asset(&mut self, asset_id: &str) -> Result<Vec<FetchRequest>, CoreError> {
        if find_by_id(&self.assets, asset_id).is_none() {
            return Err(CoreError::AssetNotFound(asset_id.to_string()));
        }

        self.tab = DetailTab::Overview;
        self.selected_id = Some(asset_id.to_string());

        let key = (asset_id.to_string(), self.query.currency);
        if self.history_key.as_ref() == Some(&key) && self.history_error.is_none() {
            return Ok(Vec::new());
        }
        Ok(vec![self.issue_history(asset_id.to_string())])
    }

    /// Close the detail view. Any pending history result is discarded.
    pub fn close_asset(&mut self) {
        self.selected_id = None;
        self.tab = DetailTab::Overview;
        self.clear_history();
    }

    /// Fetch the selected asset's history if it is listed again but the
    /// stored series belongs to another asset or currency.
    ///
    /// Meant to run after an applied `complete_markets`; a failed history
    /// fetch for the same key is not retried here.
    pub fn resume_history(&mut self) -> Option<FetchRequest> {
        let id = self.selected_asset()?.id.clone();
        if self.history_is_current() {
            return None;
        }
        Some(self.issue_history(id))
    }

    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    // ── Completions ─────────────────────────────────────────────────

    /// Apply the result of a market fetch. Returns `false` if `id` was
    /// superseded and the result was dropped.
    pub fn complete_markets(
        &mut self,
        id: RequestId,
        result: Result<Vec<AssetSnapshot>, CoreError>,
    ) -> bool {
        if !self.markets_seq.is_latest(id) {
            tracing::debug!(request = %id, "discarding stale market listing result");
            return false;
        }

        self.loading = false;
        match result {
            Ok(assets) => {
                self.assets = assets;
                self.markets_error = None;
            }
            Err(e) => {
                tracing::warn!(request = %id, "market listing unavailable: {e}");
                self.markets_error = Some(FetchFailure {
                    kind: FetchKind::Markets,
                    message: e.to_string(),
                });
            }
        }
        true
    }

    /// Apply the result of a history fetch. Returns `false` if `id` was
    /// superseded (or the detail view was closed) and the result was dropped.
    pub fn complete_history(
        &mut self,
        id: RequestId,
        result: Result<HistorySeriesSet, CoreError>,
    ) -> bool {
        if !self.history_seq.is_latest(id) {
            tracing::debug!(request = %id, "discarding stale asset history result");
            return false;
        }

        self.history_loading = false;
        match result {
            Ok(history) => {
                self.history = history;
                self.history_error = None;
            }
            Err(e) => {
                tracing::warn!(request = %id, "asset history unavailable: {e}");
                self.history_error = Some(FetchFailure {
                    kind: FetchKind::History,
                    message: e.to_string(),
                });
            }
        }
        true
    }

    // ── Readers ─────────────────────────────────────────────────────

    pub fn query(&self) -> &MarketQuery {
        &self.query
    }

    pub fn history_days(&self) -> u32 {
        self.history_days
    }

    pub fn assets(&self) -> &[AssetSnapshot] {
        &self.assets
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn markets_error(&self) -> Option<&FetchFailure> {
        self.markets_error.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// The selected asset, looked up by id in the current list.
    /// `None` if nothing is selected or the row is no longer listed.
    pub fn selected_asset(&self) -> Option<&AssetSnapshot> {
        self.selected_id
            .as_deref()
            .and_then(|id| find_by_id(&self.assets, id))
    }

    pub fn active_tab(&self) -> DetailTab {
        self.tab
    }

    /// History of the selected asset in the current currency; empty when no
    /// asset resolves or the stored series was fetched for something else.
    pub fn history(&self) -> &HistorySeriesSet {
        if self.history_is_current() {
            &self.history
        } else {
            &EMPTY_HISTORY
        }
    }

    pub fn is_history_loading(&self) -> bool {
        self.history_loading && self.history_is_current()
    }

    /// Last history failure, shown only while its asset is listed and selected.
    pub fn history_error(&self) -> Option<&FetchFailure> {
        self.history_error
            .as_ref()
            .filter(|_| self.history_is_current())
    }

    /// Chart series for the active tab; `None` on the overview tab.
    pub fn chart_series(&self, charts: &ChartService) -> Option<Vec<ChartDataPoint>> {
        charts.project(self.tab, self.history())
    }

    /// Everything a rendering surface needs for one frame.
    pub fn view<'a>(&'a self, charts: &ChartService) -> DashboardView<'a> {
        DashboardView {
            query: &self.query,
            assets: &self.assets,
            is_loading: self.loading,
            markets_error: self.markets_error.as_ref(),
            selected_asset: self.selected_asset(),
            active_tab: self.tab,
            chart_series: self.chart_series(charts),
            is_history_loading: self.is_history_loading(),
            history_error: self.history_error(),
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    /// True when the selection resolves and the stored (or pending) history
    /// was issued for that asset in the current currency.
    fn history_is_current(&self) -> bool {
        let Some(asset) = self.selected_asset() else {
            return false;
        };
        matches!(
            &self.history_key,
            Some((id, currency)) if *id == asset.id && *currency == self.query.currency
        )
    }

    fn clear_history(&mut self) {
        self.history = HistorySeriesSet::new();
        self.history_key = None;
        self.history_loading = false;
        self.history_error = None;
        self.history_seq.invalidate();
    }

    fn issue_markets(&mut self) -> FetchRequest {
        let id = self.markets_seq.issue();
        self.loading = true;
        self.markets_error = None;
        tracing::debug!(request = %id, query = ?self.query, "issuing market listing fetch");
        FetchRequest::Markets {
            id,
            query: self.query,
        }
    }

    fn issue_history(&mut self, asset_id: String) -> FetchRequest {
        let id = self.history_seq.issue();
        let currency = self.query.currency;
        self.history = HistorySeriesSet::new();
        self.history_key = Some((asset_id.clone(), currency));
        self.history_loading = true;
        self.history_error = None;
        tracing::debug!(request = %id, asset_id = %asset_id, currency = %currency, "issuing asset history fetch");
        FetchRequest::History {
            id,
            asset_id,
            currency,
            days: self.history_days,
        }
    }
}

/// Read-only snapshot of the dashboard for rendering.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub query: &'a MarketQuery,
    pub assets: &'a [AssetSnapshot],
    pub is_loading: bool,
    pub markets_error: Option<&'a FetchFailure>,
    pub selected_asset: Option<&'a AssetSnapshot>,
    pub active_tab: DetailTab,
    /// `None` on the overview tab
    pub chart_series: Option<Vec<ChartDataPoint>>,
    pub is_history_loading: bool,
    pub history_error: Option<&'a FetchFailure>,
}
