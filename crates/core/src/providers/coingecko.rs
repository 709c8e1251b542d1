use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::crypto::{CryptoDetailRecord, CryptoRecord, Metric, PricePoint, Volatility};
use crate::models::settings::DEFAULT_COINGECKO_URL;
use super::http::{build_client, get_json};
use super::traits::CryptoProvider;

const PROVIDER: &str = "CoinGecko";

/// CoinGecko API provider for cryptocurrency market data.
///
/// - **Free**: public endpoints need no API key (rate limited).
/// - **Endpoints**: `/coins/markets`, `/coins/{id}`, `/coins/{id}/market_chart`
///
/// All prices are USD.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_COINGECKO_URL, Duration::from_secs(30))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
pub(crate) struct MarketEntry {
    id: String,
    name: String,
    symbol: String,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    image: Option<String>,
}

#[derive(Deserialize, Default)]
struct UsdValue {
    usd: Option<f64>,
}

#[derive(Deserialize)]
struct CoinImage {
    large: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct CoinDetails {
    name: String,
    symbol: String,
    image: Option<CoinImage>,
    market_data: MarketData,
}

#[derive(Deserialize)]
struct MarketData {
    current_price: UsdValue,
    #[serde(default)]
    price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    market_cap: UsdValue,
    #[serde(default)]
    total_volume: UsdValue,
    #[serde(default)]
    circulating_supply: Option<f64>,
    #[serde(default)]
    ath: UsdValue,
    #[serde(default)]
    low_24h: UsdValue,
    #[serde(default)]
    high_24h: UsdValue,
    #[serde(default)]
    market_cap_percentage: Option<f64>,
    #[serde(default)]
    total_volume_change_24h_in_currency: UsdValue,
    #[serde(default)]
    price_change_percentage_1y: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct MarketChart {
    /// `[unix millis, price]` pairs
    prices: Vec<[f64; 2]>,
}

pub(crate) fn market_to_record(entry: MarketEntry) -> Result<CryptoRecord, CoreError> {
    let price = entry.current_price.ok_or_else(|| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("No price data for {}", entry.id),
    })?;

    Ok(CryptoRecord {
        id: entry.id,
        name: entry.name,
        symbol: entry.symbol,
        price,
        price_change_24h: entry.price_change_percentage_24h.unwrap_or(0.0),
        market_cap: entry.market_cap.unwrap_or(0.0),
        volume_24h: entry.total_volume,
        image: entry.image,
    })
}

/// Combine the coin record and its chart into one detail record.
pub(crate) fn build_detail(
    id: &str,
    details: CoinDetails,
    chart: MarketChart,
) -> Result<CryptoDetailRecord, CoreError> {
    let md = details.market_data;
    let price = md.current_price.usd.ok_or_else(|| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("No price data for {id}"),
    })?;
    let change_24h = md.price_change_percentage_24h.unwrap_or(0.0);
    let volume = md.total_volume.usd.unwrap_or(0.0);
    let roi_1y = md.price_change_percentage_1y.unwrap_or(0.0);

    let price_history = chart
        .prices
        .iter()
        .filter_map(|[millis, price]| {
            let dt = chrono::DateTime::from_timestamp_millis(*millis as i64)?;
            Some(PricePoint {
                date: dt.format("%b %-d").to_string(),
                price: *price,
            })
        })
        .collect();

    let metrics = vec![
        Metric {
            name: "Market Dominance".into(),
            value: format!("{:.2}%", md.market_cap_percentage.unwrap_or(0.0)),
            change: Some(0.0),
            description: "Percentage of total market capitalization".into(),
        },
        Metric {
            name: "Trading Volume".into(),
            value: format!("${:.2}B", volume / 1e9),
            change: Some(md.total_volume_change_24h_in_currency.usd.unwrap_or(0.0)),
            description: "24h trading volume".into(),
        },
        Metric {
            name: "Volatility".into(),
            value: Volatility::from_change_24h(change_24h).to_string(),
            change: None,
            description: "Price volatility classification".into(),
        },
        Metric {
            name: "ROI (1 Year)".into(),
            value: format!("{roi_1y:.2}%"),
            change: Some(roi_1y),
            description: "Return on investment over past year".into(),
        },
    ];

    Ok(CryptoDetailRecord {
        id: id.to_string(),
        name: details.name,
        symbol: details.symbol,
        price,
        price_change_24h: change_24h,
        market_cap: md.market_cap.usd.unwrap_or(0.0),
        volume_24h: volume,
        circulating_supply: md.circulating_supply.unwrap_or(0.0),
        all_time_high: md.ath.usd.unwrap_or(0.0),
        low_24h: md.low_24h.usd.unwrap_or(0.0),
        high_24h: md.high_24h.usd.unwrap_or(0.0),
        image: details.image.and_then(|i| i.large),
        price_history,
        metrics,
    })
}

#[async_trait]
impl CryptoProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_markets(&self, ids: &[&str]) -> Result<Vec<CryptoRecord>, CoreError> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&ids={}&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h",
            self.base_url,
            ids.join(","),
            ids.len()
        );

        let entries: Vec<MarketEntry> = get_json(&self.client, PROVIDER, &url, "crypto markets").await?;
        entries.into_iter().map(market_to_record).collect()
    }

    async fn get_details(&self, id: &str) -> Result<CryptoDetailRecord, CoreError> {
        let details_url = format!(
            "{}/coins/{id}?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false",
            self.base_url
        );
        let details: CoinDetails =
            get_json(&self.client, PROVIDER, &details_url, &format!("details for {id}")).await?;

        let chart_url = format!(
            "{}/coins/{id}/market_chart?vs_currency=usd&days=30&interval=daily",
            self.base_url
        );
        let chart: MarketChart =
            get_json(&self.client, PROVIDER, &chart_url, &format!("chart data for {id}")).await?;

        build_detail(id, details, chart)
    }
}
