use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One market-data record for a single tradable asset at fetch time.
///
/// Mirrors a row of the CoinGecko `/coins/markets` response. The provider
/// sends `null` for many numeric fields (an uncapped supply has no
/// `max_supply`, freshly listed coins have no rank), so those are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Stable provider identifier (e.g., "bitcoin", "ethereum")
    pub id: String,

    /// Ticker symbol as sent by the provider (e.g., "btc")
    #[serde(default)]
    pub symbol: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Logo URL
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub market_cap: Option<f64>,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    #[serde(default)]
    pub total_volume: Option<f64>,

    #[serde(default)]
    pub high_24h: Option<f64>,

    #[serde(default)]
    pub low_24h: Option<f64>,

    #[serde(default)]
    pub price_change_24h: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub circulating_supply: Option<f64>,

    #[serde(default)]
    pub total_supply: Option<f64>,

    #[serde(default)]
    pub max_supply: Option<f64>,

    /// All-time-high price
    #[serde(default)]
    pub ath: Option<f64>,

    #[serde(default)]
    pub ath_change_percentage: Option<f64>,

    #[serde(default)]
    pub ath_date: Option<DateTime<Utc>>,

    /// All-time-low price
    #[serde(default)]
    pub atl: Option<f64>,

    #[serde(default)]
    pub atl_change_percentage: Option<f64>,

    #[serde(default)]
    pub atl_date: Option<DateTime<Utc>>,
}

impl AssetSnapshot {
    /// Minimal snapshot with every market figure unset.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: String::new(),
            name: name.into(),
            image: String::new(),
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            total_volume: None,
            high_24h: None,
            low_24h: None,
            price_change_24h: None,
            price_change_percentage_24h: None,
            circulating_supply: None,
            total_supply: None,
            max_supply: None,
            ath: None,
            ath_change_percentage: None,
            ath_date: None,
            atl: None,
            atl_change_percentage: None,
            atl_date: None,
        }
    }
}

/// Find a snapshot by its identifier.
pub fn find_by_id<'a>(assets: &'a [AssetSnapshot], id: &str) -> Option<&'a AssetSnapshot> {
    assets.iter().find(|a| a.id == id)
}
