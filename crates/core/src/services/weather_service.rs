use std::sync::Arc;
use tokio::task::JoinSet;

use crate::errors::CoreError;
use crate::models::tracked::{find_city, TRACKED_CITIES};
use crate::models::weather::WeatherRecord;
use crate::providers::traits::WeatherProvider;
use crate::state::policy::{FetchOutcome, SlicePolicies};
use crate::state::store::Store;

use super::fallback;

/// Fills the weather list and weather-detail slices.
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    policies: SlicePolicies,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, policies: SlicePolicies) -> Self {
        Self { provider, policies }
    }

    /// Refresh current conditions for every tracked city.
    ///
    /// Cities are fetched concurrently; one failing city fails the whole
    /// batch and the weather policy decides what the slice shows.
    pub async fn fetch_all(&self, store: &Store) -> FetchOutcome {
        let token = store.write(|s| s.weather.begin());
        let result = self.fetch_current_all().await;

        if let Err(e) = &result {
            tracing::warn!(slice = "weather", policy = ?self.policies.weather, error = %e, "fetch failed");
        }
        let outcome = store.write(|s| {
            s.weather
                .settle(token, result, self.policies.weather, fallback::weather_list)
        });
        if outcome == FetchOutcome::Superseded {
            tracing::debug!(slice = "weather", "discarded superseded response");
        }
        outcome
    }

    /// Load the detail view for one city. Unknown cities are rejected
    /// before any request is made and leave the slice untouched.
    pub async fn fetch_details(&self, store: &Store, city_name: &str) -> Result<FetchOutcome, CoreError> {
        let city = find_city(city_name).ok_or_else(|| CoreError::UnknownCity(city_name.to_string()))?;

        let token = store.write(|s| {
            // Stale data is only ever served for the same city.
            if s.weather_details.data().as_ref().is_some_and(|d| d.city != city.name) {
                *s.weather_details.data_mut() = None;
            }
            s.weather_details.begin()
        });
        let result = self.provider.get_details(city).await.map(Some);

        if let Err(e) = &result {
            tracing::warn!(
                slice = "weather_details",
                city = city.name,
                policy = ?self.policies.weather_details,
                error = %e,
                "fetch failed"
            );
        }
        Ok(store.write(|s| {
            s.weather_details.settle(token, result, self.policies.weather_details, || {
                Some(fallback::weather_details(city, chrono::Utc::now()))
            })
        }))
    }

    async fn fetch_current_all(&self) -> Result<Vec<WeatherRecord>, CoreError> {
        let mut tasks = JoinSet::new();
        for (idx, city) in TRACKED_CITIES.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            tasks.spawn(async move { (idx, provider.get_current(city).await) });
        }

        let mut slots: Vec<Option<WeatherRecord>> = vec![None; TRACKED_CITIES.len()];
        while let Some(joined) = tasks.join_next().await {
            let (idx, result) = joined.map_err(|e| CoreError::Api {
                provider: self.provider.name().to_string(),
                message: format!("weather task failed: {e}"),
            })?;
            slots[idx] = Some(result?);
        }

        // Every slot is filled once all tasks succeeded.
        Ok(slots.into_iter().flatten().collect())
    }
}
