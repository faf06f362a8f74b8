use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use coin_dashboard_core::errors::CoreError;
use coin_dashboard_core::models::asset::AssetSnapshot;
use coin_dashboard_core::models::chart::DetailTab;
use coin_dashboard_core::models::history::{HistoryPoint, HistorySeriesSet};
use coin_dashboard_core::models::overview::StatValue;
use coin_dashboard_core::models::query::{Currency, MarketQuery, SortOrder};
use coin_dashboard_core::models::settings::Settings;
use coin_dashboard_core::providers::traits::MarketDataProvider;
use coin_dashboard_core::CoinDashboard;

// ═══════════════════════════════════════════════════════════════════
// Mock Market Provider (for testing without real API calls)
// ═══════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Markets(MarketQuery),
    History {
        asset_id: String,
        currency: Currency,
        days: u32,
    },
}

/// Serves a synthetic ranked universe of 500 assets and records every call.
/// Rank 1 is "bitcoin", rank 2 "ethereum", the rest "coin-{rank}".
struct RecordingProvider {
    calls: Mutex<Vec<Call>>,
    fail: AtomicBool,
}

const UNIVERSE: u32 = 500;
const DAY_MS: i64 = 86_400_000;
const HISTORY_START_MS: i64 = 1_711_843_200_000;

impl RecordingProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        })
    }

    fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn asset_for_rank(rank: u32, currency: Currency) -> AssetSnapshot {
        let (id, name) = match rank {
            1 => ("bitcoin".to_string(), "Bitcoin".to_string()),
            2 => ("ethereum".to_string(), "Ethereum".to_string()),
            r => (format!("coin-{r}"), format!("Coin {r}")),
        };
        let fx = if currency == Currency::Eur { 0.9 } else { 1.0 };
        AssetSnapshot {
            symbol: id.chars().take(3).collect(),
            current_price: Some(fx * 100_000.0 / rank as f64),
            market_cap: Some(fx * 1.0e12 / rank as f64),
            market_cap_rank: Some(rank),
            total_volume: Some(fx * 1.0e9 / rank as f64),
            ..AssetSnapshot::new(id, name)
        }
    }
}

#[async_trait]
impl MarketDataProvider for RecordingProvider {
    fn name(&self) -> &str {
        "Recording"
    }

    async fn fetch_markets(&self, query: &MarketQuery) -> Result<Vec<AssetSnapshot>, CoreError> {
        self.record(Call::Markets(*query));
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Network("simulated outage".into()));
        }

        let start = (query.page - 1) * query.page_size;
        let ranks: Vec<u32> = match query.order {
            SortOrder::MarketCapDesc => (1..=UNIVERSE).collect(),
            SortOrder::MarketCapAsc => (1..=UNIVERSE).rev().collect(),
        };
        Ok(ranks
            .into_iter()
            .skip(start as usize)
            .take(query.page_size as usize)
            .map(|rank| Self::asset_for_rank(rank, query.currency))
            .collect())
    }

    async fn fetch_history(
        &self,
        asset_id: &str,
        currency: Currency,
        days: u32,
    ) -> Result<HistorySeriesSet, CoreError> {
        self.record(Call::History {
            asset_id: asset_id.to_string(),
            currency,
            days,
        });
        if self.fail.load(Ordering::SeqCst) {
            return Err(CoreError::Api {
                provider: "Recording".into(),
                message: "HTTP 503".into(),
            });
        }

        let series = |scale: f64| -> Vec<HistoryPoint> {
            (0..days as i64)
                .map(|d| HistoryPoint::new(HISTORY_START_MS + d * DAY_MS, scale * (d + 1) as f64))
                .collect()
        };
        Ok(HistorySeriesSet {
            prices: series(1_000.0),
            market_caps: series(1.0e10),
            total_volumes: series(1.0e8),
        })
    }
}

async fn loaded_dashboard() -> (CoinDashboard, Arc<RecordingProvider>) {
    let provider = RecordingProvider::new();
    let mut dashboard = CoinDashboard::with_provider(Settings::default(), provider.clone()).unwrap();
    dashboard.load().await;
    (dashboard, provider)
}

// ═══════════════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn new_with_default_settings() {
        let dashboard = CoinDashboard::new(Settings::default()).unwrap();
        assert_eq!(*dashboard.query(), MarketQuery::default());
        assert!(dashboard.view().assets.is_empty());
        assert!(!dashboard.view().is_loading);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = Settings {
            history_days: 0,
            ..Settings::default()
        };
        assert!(matches!(CoinDashboard::new(settings), Err(CoreError::Config(_))));
    }

    #[test]
    fn debug_output_names_provider() {
        let dashboard =
            CoinDashboard::with_provider(Settings::default(), RecordingProvider::new()).unwrap();
        let debug = format!("{dashboard:?}");
        assert!(debug.contains("CoinDashboard"));
        assert!(debug.contains("Recording"));
    }

    #[test]
    fn nothing_is_fetched_before_load() {
        let provider = RecordingProvider::new();
        let _dashboard =
            CoinDashboard::with_provider(Settings::default(), provider.clone()).unwrap();
        assert!(provider.calls().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Market listing scenarios
// ═══════════════════════════════════════════════════════════════════

mod market_listing {
    use super::*;

    #[tokio::test]
    async fn first_page_sorted_by_market_cap_desc() {
        let (dashboard, provider) = loaded_dashboard().await;
        let view = dashboard.view();

        assert!(!view.is_loading);
        assert_eq!(view.assets.len(), 10);
        assert_eq!(view.assets[0].id, "bitcoin");
        let caps: Vec<f64> = view.assets.iter().map(|a| a.market_cap.unwrap()).collect();
        assert!(caps.windows(2).all(|w| w[0] >= w[1]));

        assert_eq!(
            provider.calls(),
            vec![Call::Markets(MarketQuery::new(
                Currency::Usd,
                SortOrder::MarketCapDesc,
                1,
                10
            ))]
        );
    }

    #[tokio::test]
    async fn ascending_order_refetches_once() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.set_order(SortOrder::MarketCapAsc).await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            Call::Markets(MarketQuery::new(Currency::Usd, SortOrder::MarketCapAsc, 1, 10))
        );
        let caps: Vec<f64> = dashboard
            .view()
            .assets
            .iter()
            .map(|a| a.market_cap.unwrap())
            .collect();
        assert!(caps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn pagination_fetches_requested_page() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.set_pagination(3, 20).await.unwrap();

        assert_eq!(dashboard.view().assets.len(), 20);
        assert_eq!(dashboard.view().assets[0].market_cap_rank, Some(41));
        assert_eq!(
            provider.calls().last(),
            Some(&Call::Markets(MarketQuery::new(
                Currency::Usd,
                SortOrder::MarketCapDesc,
                3,
                20
            )))
        );
    }

    #[tokio::test]
    async fn invalid_pagination_is_an_error_without_fetch() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        let err = dashboard.set_pagination(0, 10).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn unchanged_settings_do_not_refetch() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.set_currency(Currency::Usd).await;
        dashboard.set_order(SortOrder::MarketCapDesc).await;
        dashboard.set_pagination(1, 10).await.unwrap();
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn load_twice_fetches_once() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.load().await;
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn load_retries_after_failed_first_load() {
        let provider = RecordingProvider::new();
        provider.set_failing(true);
        let mut dashboard =
            CoinDashboard::with_provider(Settings::default(), provider.clone()).unwrap();
        dashboard.load().await;
        assert!(dashboard.view().assets.is_empty());

        provider.set_failing(false);
        dashboard.load().await;
        assert_eq!(dashboard.view().assets.len(), 10);
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn refresh_refetches_current_page() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.refresh().await;
        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[tokio::test]
    async fn failure_keeps_rows_and_surfaces_error() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        let before: Vec<String> = dashboard.view().assets.iter().map(|a| a.id.clone()).collect();

        provider.set_failing(true);
        dashboard.set_pagination(2, 10).await.unwrap();

        let view = dashboard.view();
        assert!(!view.is_loading);
        let after: Vec<String> = view.assets.iter().map(|a| a.id.clone()).collect();
        assert_eq!(before, after);
        let failure = view.markets_error.unwrap();
        assert!(failure.message.contains("simulated outage"));
    }

    #[tokio::test]
    async fn recovery_clears_error() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        provider.set_failing(true);
        dashboard.refresh().await;
        assert!(dashboard.view().markets_error.is_some());

        provider.set_failing(false);
        dashboard.refresh().await;
        assert!(dashboard.view().markets_error.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Asset detail scenarios
// ═══════════════════════════════════════════════════════════════════

mod asset_detail {
    use super::*;

    #[tokio::test]
    async fn opening_bitcoin_loads_thirty_days() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();

        assert_eq!(
            provider.calls()[1],
            Call::History {
                asset_id: "bitcoin".into(),
                currency: Currency::Usd,
                days: 30,
            }
        );
        let history = dashboard.state().history();
        assert_eq!(history.prices.len(), 30);
        assert_eq!(history.market_caps.len(), 30);
        assert_eq!(history.total_volumes.len(), 30);
        assert_eq!(dashboard.view().active_tab, DetailTab::Overview);
        assert!(dashboard.chart_series().is_none());
    }

    #[tokio::test]
    async fn price_tab_projects_every_point() {
        let (mut dashboard, _) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();
        dashboard.select_tab(DetailTab::Prices);

        let points = dashboard.chart_series().unwrap();
        assert_eq!(points.len(), 30);
        assert_eq!(points[0].value, 1_000.0);
        assert_eq!(points[0].date, "3/31/2024, 12:00:00 AM");
        assert_eq!(points[29].value, 30_000.0);
    }

    #[tokio::test]
    async fn tabs_switch_series_without_fetching() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();

        dashboard.select_tab(DetailTab::MarketCaps);
        assert_eq!(dashboard.chart_series().unwrap()[0].value, 1.0e10);
        dashboard.select_tab(DetailTab::TotalVolumes);
        assert_eq!(dashboard.chart_series().unwrap()[0].value, 1.0e8);
        dashboard.select_tab(DetailTab::Overview);
        assert!(dashboard.chart_series().is_none());

        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn no_selection_no_history_fetch() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.set_currency(Currency::Eur).await;
        assert!(provider
            .calls()
            .iter()
            .all(|c| matches!(c, Call::Markets(_))));
        dashboard.select_tab(DetailTab::Prices);
        assert_eq!(dashboard.chart_series(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn opening_unlisted_asset_fails() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        let err = dashboard.open_asset("dogecoin").await.unwrap_err();
        assert!(matches!(err, CoreError::AssetNotFound(_)));
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn currency_change_refetches_list_and_history() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.open_asset("ethereum").await.unwrap();
        dashboard.set_currency(Currency::Eur).await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(
            calls[2],
            Call::Markets(MarketQuery::new(Currency::Eur, SortOrder::MarketCapDesc, 1, 10))
        );
        assert_eq!(
            calls[3],
            Call::History {
                asset_id: "ethereum".into(),
                currency: Currency::Eur,
                days: 30,
            }
        );
        assert_eq!(dashboard.selected_asset().unwrap().id, "ethereum");
        assert_eq!(dashboard.state().history().prices.len(), 30);
    }

    #[tokio::test]
    async fn history_failure_is_visible_and_retryable() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        provider.set_failing(true);
        dashboard.open_asset("bitcoin").await.unwrap();

        let view = dashboard.view();
        assert!(!view.is_history_loading);
        assert!(view.history_error.unwrap().message.contains("HTTP 503"));
        assert!(dashboard.state().history().is_empty());

        provider.set_failing(false);
        dashboard.open_asset("bitcoin").await.unwrap();
        assert!(dashboard.view().history_error.is_none());
        assert_eq!(dashboard.state().history().prices.len(), 30);
    }

    #[tokio::test]
    async fn close_resets_detail_view() {
        let (mut dashboard, _) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();
        dashboard.select_tab(DetailTab::Prices);
        dashboard.close_asset();

        let view = dashboard.view();
        assert!(view.selected_asset.is_none());
        assert_eq!(view.active_tab, DetailTab::Overview);
        assert!(dashboard.overview().is_none());
    }

    #[tokio::test]
    async fn paging_away_hides_selection() {
        let (mut dashboard, _) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();
        dashboard.set_pagination(2, 10).await.unwrap();

        assert!(dashboard.selected_asset().is_none());
        assert!(dashboard.overview().is_none());
        dashboard.select_tab(DetailTab::Prices);
        assert_eq!(dashboard.chart_series(), Some(Vec::new()));
    }

    #[tokio::test]
    async fn currency_change_while_paged_away_reloads_history_on_return() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();
        dashboard.set_pagination(2, 10).await.unwrap();
        dashboard.set_currency(Currency::Eur).await;
        assert_eq!(provider.calls().len(), 4);

        dashboard.set_pagination(1, 10).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(
            calls[5],
            Call::History {
                asset_id: "bitcoin".into(),
                currency: Currency::Eur,
                days: 30,
            }
        );
        assert_eq!(dashboard.selected_asset().unwrap().id, "bitcoin");
        assert_eq!(dashboard.state().history().prices.len(), 30);
        assert!(dashboard.view().history_error.is_none());
    }

    #[tokio::test]
    async fn paging_back_reuses_loaded_history() {
        let (mut dashboard, provider) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();
        dashboard.set_pagination(2, 10).await.unwrap();
        dashboard.set_pagination(1, 10).await.unwrap();

        assert_eq!(provider.calls().len(), 4);
        assert_eq!(dashboard.state().history().prices.len(), 30);
    }

    #[tokio::test]
    async fn overview_statistics_for_selection() {
        let (mut dashboard, _) = loaded_dashboard().await;
        dashboard.open_asset("bitcoin").await.unwrap();

        let stats = dashboard.overview().unwrap();
        assert_eq!(stats[0].title, "Current Price");
        assert_eq!(stats[0].value, StatValue::Number(100_000.0));
        assert_eq!(stats[0].suffix.as_deref(), Some("USD"));
        assert_eq!(dashboard.chart_caption(), "Time Interval - last 30 days");
    }
}
