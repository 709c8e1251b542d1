//! The fixed set of cities and assets the dashboard follows.

/// A city addressed by coordinates on the weather API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedCity {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub static TRACKED_CITIES: [TrackedCity; 3] = [
    TrackedCity { name: "New York", lat: 40.7128, lon: -74.006 },
    TrackedCity { name: "London", lat: 51.5074, lon: -0.1278 },
    TrackedCity { name: "Tokyo", lat: 35.6762, lon: 139.6503 },
];

/// A tracked asset plus the reference figures used for fallback data and
/// as the simulator's anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    /// Price every simulated tick perturbs (never the live price)
    pub anchor_price: f64,
    pub anchor_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub all_time_high: f64,
    pub dominance_pct: f64,
    pub dominance_change: f64,
    pub volume_change: f64,
    pub roi_1y: f64,
    pub volatility_label: &'static str,
}

pub static TRACKED_ASSETS: [TrackedAsset; 3] = [
    TrackedAsset {
        id: "bitcoin",
        name: "Bitcoin",
        symbol: "btc",
        anchor_price: 50432.75,
        anchor_change_24h: 2.5,
        market_cap: 980_000_000_000.0,
        volume_24h: 28_000_000_000.0,
        circulating_supply: 19_000_000.0,
        all_time_high: 69_000.0,
        dominance_pct: 42.0,
        dominance_change: -0.5,
        volume_change: 3.2,
        roi_1y: 32.0,
        volatility_label: "Medium",
    },
    TrackedAsset {
        id: "ethereum",
        name: "Ethereum",
        symbol: "eth",
        anchor_price: 2950.42,
        anchor_change_24h: -1.2,
        market_cap: 350_000_000_000.0,
        volume_24h: 15_000_000_000.0,
        circulating_supply: 120_000_000.0,
        all_time_high: 4_800.0,
        dominance_pct: 18.0,
        dominance_change: 1.2,
        volume_change: -2.1,
        roi_1y: 28.0,
        volatility_label: "Medium",
    },
    TrackedAsset {
        id: "solana",
        name: "Solana",
        symbol: "sol",
        anchor_price: 142.87,
        anchor_change_24h: 5.8,
        market_cap: 62_000_000_000.0,
        volume_24h: 3_500_000_000.0,
        circulating_supply: 430_000_000.0,
        all_time_high: 260.0,
        dominance_pct: 2.5,
        dominance_change: 0.8,
        volume_change: 5.4,
        roi_1y: 45.0,
        volatility_label: "High",
    },
];

/// Normalise a city name for lookup: lowercase, whitespace removed.
pub fn city_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find a tracked city by any spelling that normalises to the same key
/// ("New York", "new york", "NewYork").
pub fn find_city(name: &str) -> Option<&'static TrackedCity> {
    let key = city_key(name);
    TRACKED_CITIES.iter().find(|c| city_key(c.name) == key)
}

pub fn find_asset(id: &str) -> Option<&'static TrackedAsset> {
    TRACKED_ASSETS.iter().find(|a| a.id == id)
}

/// Comma-separated ids in tracking order, for the markets endpoint.
pub fn asset_ids() -> String {
    TRACKED_ASSETS.iter().map(|a| a.id).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_lookup_ignores_case_and_spaces() {
        assert_eq!(city_key("New York"), "newyork");
        assert_eq!(find_city("newyork").map(|c| c.name), Some("New York"));
        assert_eq!(find_city("  LONDON ").map(|c| c.name), Some("London"));
        assert!(find_city("Paris").is_none());
    }

    #[test]
    fn asset_lookup_is_exact() {
        assert!(find_asset("bitcoin").is_some());
        assert!(find_asset("Bitcoin").is_none());
        assert_eq!(asset_ids(), "bitcoin,ethereum,solana");
    }
}
