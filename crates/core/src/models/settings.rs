use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::CoreError;
use crate::simulator::SimulatorConfig;
use crate::state::policy::SlicePolicies;

pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_NEWSAPI_URL: &str = "https://newsapi.org/v2";

/// Runtime configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub coingecko_base_url: String,
    pub openweather_base_url: String,
    pub newsapi_base_url: String,

    /// API keys by provider name ("openweather", "newsapi").
    /// CoinGecko's public endpoints need none.
    pub api_keys: HashMap<String, String>,

    /// NewsAPI top-headlines category
    pub news_category: String,

    /// JSON file backing the preference store
    pub preferences_path: PathBuf,

    /// Period of the weather + crypto refresh loop
    pub refresh_interval_secs: u64,

    /// Per-request HTTP timeout
    pub http_timeout_secs: u64,

    /// Number of headlines substituted when the news fetch fails
    pub news_fallback_size: usize,

    pub simulator: SimulatorConfig,

    pub policies: SlicePolicies,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coingecko_base_url: DEFAULT_COINGECKO_URL.to_string(),
            openweather_base_url: DEFAULT_OPENWEATHER_URL.to_string(),
            newsapi_base_url: DEFAULT_NEWSAPI_URL.to_string(),
            api_keys: HashMap::new(),
            news_category: "business".to_string(),
            preferences_path: PathBuf::from("pulse-preferences.json"),
            refresh_interval_secs: 60,
            http_timeout_secs: 30,
            news_fallback_size: 5,
            simulator: SimulatorConfig::default(),
            policies: SlicePolicies::default(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment, starting from defaults.
    ///
    /// Recognised variables: `OPENWEATHER_API_KEY`, `NEWS_API_KEY`,
    /// `COINGECKO_BASE_URL`, `OPENWEATHER_BASE_URL`, `NEWSAPI_BASE_URL`,
    /// `NEWS_CATEGORY`, `PULSE_PREFERENCES_PATH`, `PULSE_REFRESH_SECS`,
    /// `PULSE_HTTP_TIMEOUT_SECS`, `PULSE_SIMULATOR_SEED`.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut settings = Self::default();

        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            settings.api_keys.insert("openweather".into(), key);
        }
        if let Ok(key) = std::env::var("NEWS_API_KEY") {
            settings.api_keys.insert("newsapi".into(), key);
        }
        if let Ok(url) = std::env::var("COINGECKO_BASE_URL") {
            settings.coingecko_base_url = url;
        }
        if let Ok(url) = std::env::var("OPENWEATHER_BASE_URL") {
            settings.openweather_base_url = url;
        }
        if let Ok(url) = std::env::var("NEWSAPI_BASE_URL") {
            settings.newsapi_base_url = url;
        }
        if let Ok(category) = std::env::var("NEWS_CATEGORY") {
            settings.news_category = category;
        }
        if let Ok(path) = std::env::var("PULSE_PREFERENCES_PATH") {
            settings.preferences_path = PathBuf::from(path);
        }
        if let Some(secs) = env_parse::<u64>("PULSE_REFRESH_SECS")? {
            settings.refresh_interval_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("PULSE_HTTP_TIMEOUT_SECS")? {
            settings.http_timeout_secs = secs;
        }
        if let Some(seed) = env_parse::<u64>("PULSE_SIMULATOR_SEED")? {
            settings.simulator.seed = Some(seed);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would spin timers or produce empty fallbacks.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::Config("refresh interval must be > 0".into()));
        }
        if self.http_timeout_secs == 0 {
            return Err(CoreError::Config("http timeout must be > 0".into()));
        }
        if self.news_fallback_size == 0 {
            return Err(CoreError::Config("news fallback size must be > 0".into()));
        }
        self.simulator.validate()
    }

    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).map(String::as_str)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| CoreError::Config(format!("{name} is not a valid number: {raw}"))),
        Err(_) => Ok(None),
    }
}
