use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Largest page size the provider accepts for `per_page`.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Fiat currency the market data is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Eur];

    /// Value sent as `vs_currency`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
        }
    }

    /// Upper-case label used as a suffix next to money figures.
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            other => Err(CoreError::ValidationError(format!(
                "Unsupported currency '{other}': expected usd or eur"
            ))),
        }
    }
}

/// Ordering of the market listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    MarketCapDesc,
    MarketCapAsc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::MarketCapDesc, SortOrder::MarketCapAsc];

    /// Value sent as `order`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "market_cap_desc",
            SortOrder::MarketCapAsc => "market_cap_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::MarketCapDesc => "Market cap descending",
            SortOrder::MarketCapAsc => "Market cap ascending",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "market_cap_desc" => Ok(SortOrder::MarketCapDesc),
            "market_cap_asc" => Ok(SortOrder::MarketCapAsc),
            other => Err(CoreError::ValidationError(format!(
                "Unsupported sort order '{other}': expected market_cap_desc or market_cap_asc"
            ))),
        }
    }
}

/// Parameters of one market listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketQuery {
    pub currency: Currency,
    pub order: SortOrder,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl Default for MarketQuery {
    fn default() -> Self {
        Self {
            currency: Currency::Usd,
            order: SortOrder::MarketCapDesc,
            page: 1,
            page_size: 10,
        }
    }
}

impl MarketQuery {
    pub fn new(currency: Currency, order: SortOrder, page: u32, page_size: u32) -> Self {
        Self {
            currency,
            order,
            page,
            page_size,
        }
    }

    /// Check the pagination bounds.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_pagination(self.page, self.page_size)
    }
}

/// Page must be ≥ 1 and page size within `1..=MAX_PAGE_SIZE`.
pub fn validate_pagination(page: u32, page_size: u32) -> Result<(), CoreError> {
    if page < 1 {
        return Err(CoreError::ValidationError(
            "Page number must be at least 1".into(),
        ));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(CoreError::ValidationError(format!(
            "Page size {page_size} out of range: must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}
