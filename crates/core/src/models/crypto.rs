use serde::{Deserialize, Serialize};

/// Market snapshot for one tracked asset, keyed by CoinGecko id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoRecord {
    /// CoinGecko id (e.g., "bitcoin")
    pub id: String,

    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Lowercase ticker (e.g., "btc")
    pub symbol: String,

    /// Last price in USD
    pub price: f64,

    /// 24h change in percent
    pub price_change_24h: f64,

    /// Market capitalisation in USD
    pub market_cap: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_24h: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A daily price point on the detail chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Day label ("Mar 14")
    pub date: String,
    pub price: f64,
}

/// A derived figure shown under the detail chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    /// Pre-formatted value ("42.10%", "$28.00B", "Medium")
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    pub description: String,
}

/// Detail view for a single asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoDetailRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub price_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub all_time_high: f64,
    pub low_24h: f64,
    pub high_24h: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub price_history: Vec<PricePoint>,
    pub metrics: Vec<Metric>,
}

/// Volatility bucket derived from the absolute 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Volatility {
    Low,
    Medium,
    High,
}

impl Volatility {
    pub fn from_change_24h(change_pct: f64) -> Self {
        let magnitude = change_pct.abs();
        if magnitude > 5.0 {
            Volatility::High
        } else if magnitude > 2.0 {
            Volatility::Medium
        } else {
            Volatility::Low
        }
    }
}

impl std::fmt::Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Volatility::Low => write!(f, "Low"),
            Volatility::Medium => write!(f, "Medium"),
            Volatility::High => write!(f, "High"),
        }
    }
}
