//! One step of each simulated feed, free of timers so it can be driven
//! directly with a seeded RNG.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::news::NewsRecord;
use crate::models::notification::{AlertMessage, NotificationKind};
use crate::models::tracked::{find_asset, TrackedAsset, TrackedCity, TRACKED_ASSETS, TRACKED_CITIES};
use crate::services::fallback::HEADLINE_POOL;
use crate::state::store::AppState;

/// Conditions a simulated weather alert can announce.
pub const ALERT_CONDITIONS: [&str; 4] = ["Heavy Rain", "Thunderstorm", "Heat Wave", "Strong Winds"];

/// A simulated price movement of one asset relative to its anchor price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceMove {
    pub asset: &'static TrackedAsset,
    /// Signed percentage, e.g. `0.5` for +0.5 %
    pub delta_pct: f64,
}

impl PriceMove {
    pub fn new(asset_id: &str, delta_pct: f64) -> Result<Self, CoreError> {
        let asset = find_asset(asset_id).ok_or_else(|| CoreError::UnknownAsset(asset_id.to_string()))?;
        Ok(Self { asset, delta_pct })
    }

    /// Uniform asset, uniform delta in `[-max_pct, max_pct]`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, max_pct: f64) -> Self {
        let asset = TRACKED_ASSETS.choose(rng).unwrap_or(&TRACKED_ASSETS[0]);
        let delta_pct = rng.gen_range(-max_pct..=max_pct);
        Self { asset, delta_pct }
    }

    /// Anchor price perturbed by the delta. Ticks never compound.
    pub fn new_price(&self) -> f64 {
        self.asset.anchor_price * (1.0 + self.delta_pct / 100.0)
    }

    pub fn new_change_24h(&self) -> f64 {
        self.asset.anchor_change_24h + self.delta_pct
    }

    /// An alert when the move is strictly larger than `threshold_pct`.
    pub fn alert(&self, threshold_pct: f64) -> Option<AlertMessage> {
        if self.delta_pct.abs() <= threshold_pct {
            return None;
        }
        let name = self.asset.name;
        let direction = if self.delta_pct > 0.0 { "increased" } else { "decreased" };
        Some(AlertMessage::new(
            NotificationKind::PriceAlert,
            format!("{name} Price Alert"),
            format!(
                "{name} has {direction} by {:.2}% in the last minute",
                self.delta_pct.abs()
            ),
        ))
    }

    /// Write the price into the crypto slice and log an alert if warranted.
    /// Returns whether a notification was appended.
    pub fn apply(&self, state: &mut AppState, threshold_pct: f64) -> bool {
        state
            .crypto
            .apply_tick(self.asset.id, self.new_price(), self.new_change_24h());

        match self.alert(threshold_pct) {
            Some(message) => {
                state.notifications.append(message);
                true
            }
            None => false,
        }
    }
}

/// A simulated severe-weather announcement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherAlert {
    pub city: &'static TrackedCity,
    pub condition: &'static str,
}

impl WeatherAlert {
    /// Pick a city and a condition; emit with `probability`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<Self> {
        let city = TRACKED_CITIES.choose(rng)?;
        let condition = *ALERT_CONDITIONS.choose(rng)?;
        rng.gen_bool(probability).then_some(Self { city, condition })
    }

    pub fn message(&self) -> AlertMessage {
        let city = self.city.name;
        AlertMessage::new(
            NotificationKind::WeatherAlert,
            format!("Weather Alert for {city}"),
            format!("{} expected in {city} in the next few hours", self.condition),
        )
    }
}

/// With `probability`, a pool headline stamped as just published.
pub fn random_headline<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> Option<NewsRecord> {
    if !rng.gen_bool(probability) {
        return None;
    }
    let h = HEADLINE_POOL.choose(rng)?;
    Some(NewsRecord {
        id: format!("live-{}", Uuid::new_v4()),
        title: h.title.to_string(),
        url: h.url.to_string(),
        source: h.source.to_string(),
        published_at: chrono::Utc::now().to_rfc3339(),
        description: Some(h.description.to_string()),
        image_url: None,
    })
}
