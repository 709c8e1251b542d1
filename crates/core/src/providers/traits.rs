use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::crypto::{CryptoDetailRecord, CryptoRecord};
use crate::models::news::NewsRecord;
use crate::models::tracked::TrackedCity;
use crate::models::weather::{WeatherDetailRecord, WeatherRecord};

/// Source of cryptocurrency market data.
///
/// Each upstream API implements one of these traits; services only see the
/// trait, so swapping an API touches a single file.
#[async_trait]
pub trait CryptoProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Market snapshot for the given ids, in the provider's order.
    async fn get_markets(&self, ids: &[&str]) -> Result<Vec<CryptoRecord>, CoreError>;

    /// Detail record plus 30 days of price history for one id.
    async fn get_details(&self, id: &str) -> Result<CryptoDetailRecord, CoreError>;
}

/// Source of weather conditions, addressed by coordinates.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn get_current(&self, city: &TrackedCity) -> Result<WeatherRecord, CoreError>;

    /// Current conditions combined with the hourly and daily forecast.
    async fn get_details(&self, city: &TrackedCity) -> Result<WeatherDetailRecord, CoreError>;
}

/// Source of headlines.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn get_headlines(&self) -> Result<Vec<NewsRecord>, CoreError>;
}
