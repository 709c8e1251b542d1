//! Built-in datasets substituted when a fetch fails under
//! [`FailurePolicy::Fallback`](crate::state::policy::FailurePolicy::Fallback).
//!
//! Everything here is deterministic except the date labels on detail
//! records, which are relative to the caller-supplied `now`.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::crypto::{CryptoDetailRecord, CryptoRecord, Metric, PricePoint};
use crate::models::news::NewsRecord;
use crate::models::tracked::{TrackedAsset, TrackedCity, TRACKED_ASSETS};
use crate::models::weather::{
    CurrentConditions, ForecastDay, HourlyPoint, TemperatureRange, WeatherDetailRecord,
    WeatherRecord,
};
use crate::providers::openweather::synthesized_history;

/// A canned headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline {
    pub title: &'static str,
    pub source: &'static str,
    pub url: &'static str,
    pub description: &'static str,
}

/// Pool shared by the news fallback and the simulated news feed.
pub static HEADLINE_POOL: [Headline; 8] = [
    Headline {
        title: "Bitcoin Tests Key Resistance as Trading Volume Climbs",
        source: "Crypto Ledger",
        url: "https://news.example.com/markets/bitcoin-resistance",
        description: "Traders watch a break above the recent range after a week of rising volume.",
    },
    Headline {
        title: "Central Banks Signal Patience on Rate Cuts",
        source: "Global Finance Wire",
        url: "https://news.example.com/economy/central-banks-patience",
        description: "Policy makers say inflation data must cool further before easing.",
    },
    Headline {
        title: "Ethereum Developers Schedule Next Network Upgrade",
        source: "Crypto Ledger",
        url: "https://news.example.com/markets/ethereum-upgrade",
        description: "The upgrade targets lower fees for rollups and faster finality.",
    },
    Headline {
        title: "Heat Waves Push Power Demand to Seasonal Highs",
        source: "Climate Desk",
        url: "https://news.example.com/energy/heat-power-demand",
        description: "Grid operators in several regions issue conservation notices.",
    },
    Headline {
        title: "Tech Stocks Rally on Strong Cloud Earnings",
        source: "Market Watch Daily",
        url: "https://news.example.com/markets/tech-rally",
        description: "Cloud revenue beats estimates across the largest providers.",
    },
    Headline {
        title: "Solana Network Activity Reaches New Record",
        source: "Crypto Ledger",
        url: "https://news.example.com/markets/solana-activity",
        description: "Daily transactions hit an all-time high amid memecoin trading.",
    },
    Headline {
        title: "Retail Sales Beat Forecasts for Third Straight Month",
        source: "Business Report",
        url: "https://news.example.com/economy/retail-sales",
        description: "Consumer spending stays resilient despite higher borrowing costs.",
    },
    Headline {
        title: "Shipping Costs Ease as Port Congestion Clears",
        source: "Global Finance Wire",
        url: "https://news.example.com/trade/shipping-costs",
        description: "Container rates fall back toward pre-disruption levels.",
    },
];

pub fn weather_list() -> Vec<WeatherRecord> {
    [
        ("New York", 18.0, "Partly Cloudy", 65.0, 12.0),
        ("London", 14.0, "Rainy", 80.0, 8.0),
        ("Tokyo", 22.0, "Sunny", 55.0, 5.0),
    ]
    .into_iter()
    .map(|(name, temperature, condition, humidity, wind)| WeatherRecord {
        name: name.to_string(),
        temperature,
        condition: condition.to_string(),
        humidity,
        wind_speed: Some(wind),
        icon: None,
    })
    .collect()
}

pub fn crypto_list() -> Vec<CryptoRecord> {
    TRACKED_ASSETS
        .iter()
        .map(|a| CryptoRecord {
            id: a.id.to_string(),
            name: a.name.to_string(),
            symbol: a.symbol.to_string(),
            price: a.anchor_price,
            price_change_24h: a.anchor_change_24h,
            market_cap: a.market_cap,
            volume_24h: None,
            image: None,
        })
        .collect()
}

/// `size` headlines from the pool (cycling if needed), each with a fixed
/// publication time one hour apart, newest first.
pub fn news(size: usize) -> Vec<NewsRecord> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default();

    (0..size)
        .map(|i| {
            let h = &HEADLINE_POOL[i % HEADLINE_POOL.len()];
            NewsRecord {
                id: format!("fallback-{i}"),
                title: h.title.to_string(),
                url: h.url.to_string(),
                source: h.source.to_string(),
                published_at: (base - Duration::hours(i as i64)).to_rfc3339(),
                description: Some(h.description.to_string()),
                image_url: None,
            }
        })
        .collect()
}

const FORECAST_CONDITIONS: [(&str, &str); 7] = [
    ("Sunny", "01d"),
    ("Partly Cloudy", "02d"),
    ("Cloudy", "03d"),
    ("Rainy", "10d"),
    ("Sunny", "01d"),
    ("Sunny", "01d"),
    ("Partly Cloudy", "02d"),
];

pub fn weather_details(city: &TrackedCity, now: DateTime<Utc>) -> WeatherDetailRecord {
    use std::f64::consts::PI;

    let hourly = (0..24)
        .map(|i| {
            let daytime = i > 6 && i < 18;
            HourlyPoint {
                time: format!("{i}:00"),
                temperature: (15.0 + ((i as f64 / 24.0) * PI * 2.0).sin() * 5.0).round(),
                condition: if daytime { "Sunny" } else { "Clear" }.to_string(),
                icon: if daytime { "01d" } else { "01n" }.to_string(),
            }
        })
        .collect();

    let forecast = FORECAST_CONDITIONS
        .iter()
        .enumerate()
        .map(|(i, (condition, icon))| {
            let wave = ((i as f64 / 7.0) * PI).sin();
            ForecastDay {
                date: (now + Duration::days(i as i64)).format("%a, %b %-d").to_string(),
                condition: condition.to_string(),
                icon: icon.to_string(),
                temperature: TemperatureRange {
                    min: (12.0 + wave * 3.0).round(),
                    max: (20.0 + wave * 5.0).round(),
                },
                humidity: (50.0 + wave * 20.0).round(),
                wind_speed: (8.0 + wave * 6.0).round(),
            }
        })
        .collect();

    WeatherDetailRecord {
        city: city.name.to_string(),
        current: CurrentConditions {
            temperature: 18.0,
            feels_like: 16.0,
            humidity: 65.0,
            wind_speed: 12.0,
            condition: "Partly Cloudy".into(),
            icon: "03d".into(),
        },
        hourly,
        historical: synthesized_history(now),
        forecast,
    }
}

pub fn crypto_details(asset: &TrackedAsset, now: DateTime<Utc>) -> CryptoDetailRecord {
    let base = asset.anchor_price;

    // Gentle upward drift with a small wobble, 30 daily points ending today.
    let price_history = (0..30)
        .map(|i| {
            let day = now - Duration::days(29 - i);
            let wobble = ((i as f64) * 0.7).sin() * 0.05;
            PricePoint {
                date: day.format("%b %-d").to_string(),
                price: base * (0.95 + wobble + i as f64 / 100.0),
            }
        })
        .collect();

    let metrics = vec![
        Metric {
            name: "Market Dominance".into(),
            value: format!("{}%", asset.dominance_pct),
            change: Some(asset.dominance_change),
            description: "Percentage of total market capitalization".into(),
        },
        Metric {
            name: "Trading Volume".into(),
            value: format!("${}B", asset.volume_24h / 1e9),
            change: Some(asset.volume_change),
            description: "24h trading volume".into(),
        },
        Metric {
            name: "Volatility".into(),
            value: asset.volatility_label.into(),
            change: None,
            description: "Price volatility classification".into(),
        },
        Metric {
            name: "ROI (1 Year)".into(),
            value: format!("{}%", asset.roi_1y),
            change: Some(asset.roi_1y),
            description: "Return on investment over past year".into(),
        },
    ];

    CryptoDetailRecord {
        id: asset.id.to_string(),
        name: asset.name.to_string(),
        symbol: asset.symbol.to_string(),
        price: base,
        price_change_24h: asset.anchor_change_24h,
        market_cap: asset.market_cap,
        volume_24h: asset.volume_24h,
        circulating_supply: asset.circulating_supply,
        all_time_high: asset.all_time_high,
        low_24h: base * 0.98,
        high_24h: base * 1.03,
        image: None,
        price_history,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn news_fallback_cycles_the_pool() {
        let items = news(HEADLINE_POOL.len() + 2);
        assert_eq!(items.len(), HEADLINE_POOL.len() + 2);
        assert_eq!(items[HEADLINE_POOL.len()].title, items[0].title);
        assert_ne!(items[HEADLINE_POOL.len()].id, items[0].id);
    }

    #[test]
    fn crypto_fallback_matches_anchors() {
        let list = crypto_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].price, 50432.75);
        assert_eq!(list[1].price_change_24h, -1.2);
    }
}
