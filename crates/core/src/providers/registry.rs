use std::sync::Arc;

use crate::models::settings::Settings;

use super::coingecko::CoinGeckoProvider;
use super::newsapi::NewsApiProvider;
use super::openweather::OpenWeatherProvider;
use super::traits::{CryptoProvider, NewsProvider, WeatherProvider};

/// The three upstream sources the dashboard reads from.
///
/// Services receive providers through this set, so tests (or an alternate
/// API) can swap any one of them without touching the rest.
#[derive(Clone)]
pub struct ProviderSet {
    pub crypto: Arc<dyn CryptoProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub news: Arc<dyn NewsProvider>,
}

impl ProviderSet {
    pub fn new(
        crypto: Arc<dyn CryptoProvider>,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Self {
        Self { crypto, weather, news }
    }

    /// CoinGecko, OpenWeatherMap and NewsAPI configured from `settings`.
    /// Missing keys are not an error here: those fetches fail and the
    /// slice's failure policy takes over.
    pub fn from_settings(settings: &Settings) -> Self {
        let timeout = settings.http_timeout();

        let crypto = CoinGeckoProvider::with_base_url(&settings.coingecko_base_url, timeout);

        let weather = OpenWeatherProvider::with_base_url(
            &settings.openweather_base_url,
            settings.api_key("openweather").map(str::to_string),
            timeout,
        );

        let news = NewsApiProvider::with_base_url(
            &settings.newsapi_base_url,
            settings.api_key("newsapi").map(str::to_string),
            settings.news_category.clone(),
            timeout,
        );

        Self::new(Arc::new(crypto), Arc::new(weather), Arc::new(news))
    }
}

impl std::fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSet")
            .field("crypto", &self.crypto.name())
            .field("weather", &self.weather.name())
            .field("news", &self.news.name())
            .finish()
    }
}
