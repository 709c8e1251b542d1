// ═══════════════════════════════════════════════════════════════════
// Shared test helpers: mock providers and record builders
// ═══════════════════════════════════════════════════════════════════

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use pulse_dashboard_core::errors::CoreError;
use pulse_dashboard_core::models::crypto::{CryptoDetailRecord, CryptoRecord};
use pulse_dashboard_core::models::news::NewsRecord;
use pulse_dashboard_core::models::settings::Settings;
use pulse_dashboard_core::models::tracked::{find_asset, TrackedCity, TRACKED_CITIES};
use pulse_dashboard_core::models::weather::{WeatherDetailRecord, WeatherRecord};
use pulse_dashboard_core::providers::registry::ProviderSet;
use pulse_dashboard_core::providers::traits::{CryptoProvider, NewsProvider, WeatherProvider};
use pulse_dashboard_core::services::fallback;
use pulse_dashboard_core::storage::kv::MemoryKeyValueStore;
use pulse_dashboard_core::Dashboard;

// ── Record builders ─────────────────────────────────────────────────

pub fn crypto_record(id: &str, name: &str, price: f64) -> CryptoRecord {
    CryptoRecord {
        id: id.into(),
        name: name.into(),
        symbol: id[..3].to_uppercase(),
        price,
        price_change_24h: 1.0,
        market_cap: price * 1_000_000.0,
        volume_24h: Some(1_000.0),
        image: None,
    }
}

/// Live-looking prices that differ from the fallback anchors.
pub fn live_crypto() -> Vec<CryptoRecord> {
    vec![
        crypto_record("bitcoin", "Bitcoin", 61_000.0),
        crypto_record("ethereum", "Ethereum", 3_100.0),
        crypto_record("solana", "Solana", 150.0),
    ]
}

pub fn weather_record(name: &str, temperature: f64) -> WeatherRecord {
    WeatherRecord {
        name: name.into(),
        temperature,
        condition: "Clear".into(),
        humidity: 40.0,
        wind_speed: Some(3.0),
        icon: Some("01d".into()),
    }
}

pub fn news_items(n: usize) -> Vec<NewsRecord> {
    (0..n)
        .map(|i| NewsRecord {
            id: format!("https://live.example.com/{i}"),
            title: format!("Live headline {i}"),
            url: format!("https://live.example.com/{i}"),
            source: "Live Wire".into(),
            published_at: "2024-03-01T10:00:00+00:00".into(),
            description: None,
            image_url: None,
        })
        .collect()
}

fn offline(provider: &str) -> CoreError {
    CoreError::Network(format!("{provider} offline"))
}

// ── Mock crypto provider ────────────────────────────────────────────

pub struct MockCrypto {
    records: Vec<CryptoRecord>,
    failing: AtomicBool,
    gate: Option<Arc<Notify>>,
    pub market_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl MockCrypto {
    pub fn new(records: Vec<CryptoRecord>) -> Self {
        Self {
            records,
            failing: AtomicBool::new(false),
            gate: None,
            market_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mock = Self::new(Vec::new());
        mock.set_failing(true);
        mock
    }

    /// Every request waits for one `notify_one` on `gate` before answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl CryptoProvider for MockCrypto {
    fn name(&self) -> &str {
        "MockCrypto"
    }

    async fn get_markets(&self, ids: &[&str]) -> Result<Vec<CryptoRecord>, CoreError> {
        self.market_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(offline("MockCrypto"));
        }
        Ok(self
            .records
            .iter()
            .filter(|r| ids.contains(&r.id.as_str()))
            .cloned()
            .collect())
    }

    async fn get_details(&self, id: &str) -> Result<CryptoDetailRecord, CoreError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_gate().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(offline("MockCrypto"));
        }
        let asset = find_asset(id).ok_or_else(|| CoreError::UnknownAsset(id.into()))?;
        let mut detail = fallback::crypto_details(asset, chrono::Utc::now());
        detail.price = 1.0;
        Ok(detail)
    }
}

// ── Mock weather provider ───────────────────────────────────────────

pub struct MockWeather {
    failing: AtomicBool,
    pub current_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
}

impl MockWeather {
    pub fn new() -> Self {
        Self {
            failing: AtomicBool::new(false),
            current_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_failing(true);
        mock
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The temperature this mock reports for `city`.
    pub fn temperature_of(city: &str) -> f64 {
        let idx = TRACKED_CITIES.iter().position(|c| c.name == city).unwrap_or(0);
        30.0 + idx as f64
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    fn name(&self) -> &str {
        "MockWeather"
    }

    async fn get_current(&self, city: &TrackedCity) -> Result<WeatherRecord, CoreError> {
        self.current_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(offline("MockWeather"));
        }
        Ok(weather_record(city.name, Self::temperature_of(city.name)))
    }

    async fn get_details(&self, city: &TrackedCity) -> Result<WeatherDetailRecord, CoreError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(offline("MockWeather"));
        }
        let mut detail = fallback::weather_details(city, chrono::Utc::now());
        detail.current.temperature = 99.0;
        Ok(detail)
    }
}

// ── Mock news provider ──────────────────────────────────────────────

pub struct MockNews {
    items: Vec<NewsRecord>,
    failing: AtomicBool,
    pub calls: AtomicUsize,
}

impl MockNews {
    pub fn new(items: Vec<NewsRecord>) -> Self {
        Self {
            items,
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let mock = Self::new(Vec::new());
        mock.set_failing(true);
        mock
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl NewsProvider for MockNews {
    fn name(&self) -> &str {
        "MockNews"
    }

    async fn get_headlines(&self) -> Result<Vec<NewsRecord>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(offline("MockNews"));
        }
        Ok(self.items.clone())
    }
}

// ── Assembly ────────────────────────────────────────────────────────

/// Handles to the mocks behind a [`ProviderSet`], for flipping failures
/// and counting calls.
pub struct Mocks {
    pub crypto: Arc<MockCrypto>,
    pub weather: Arc<MockWeather>,
    pub news: Arc<MockNews>,
}

impl Mocks {
    pub fn healthy() -> Self {
        Self {
            crypto: Arc::new(MockCrypto::new(live_crypto())),
            weather: Arc::new(MockWeather::new()),
            news: Arc::new(MockNews::new(news_items(8))),
        }
    }

    pub fn failing() -> Self {
        Self {
            crypto: Arc::new(MockCrypto::failing()),
            weather: Arc::new(MockWeather::failing()),
            news: Arc::new(MockNews::failing()),
        }
    }

    pub fn provider_set(&self) -> ProviderSet {
        ProviderSet::new(self.crypto.clone(), self.weather.clone(), self.news.clone())
    }
}

/// Default settings with a fixed simulator seed.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.simulator.seed = Some(42);
    settings
}

pub fn dashboard_with(mocks: &Mocks, settings: Settings) -> Dashboard {
    Dashboard::new(settings, mocks.provider_set(), Box::new(MemoryKeyValueStore::new()))
        .expect("valid test settings")
}
