use serde::{Deserialize, Serialize};

/// Current conditions for one tracked city, as shown in the list view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    /// City display name (e.g., "New York")
    pub name: String,

    /// Temperature in degrees Celsius
    pub temperature: f64,

    /// Short condition label (e.g., "Clouds", "Rainy")
    pub condition: String,

    /// Relative humidity in percent
    pub humidity: f64,

    /// Wind speed in metres per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,

    /// OpenWeatherMap icon code (e.g., "10d")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Full detail view for a single city: now, next 24h, past week, next days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDetailRecord {
    /// Display name of the city this view belongs to
    pub city: String,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyPoint>,
    pub historical: Vec<HistoricalPoint>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPoint {
    /// Local time label ("14:00")
    pub time: String,
    pub temperature: f64,
    pub condition: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Day label ("Jan 5")
    pub date: String,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    /// Day label ("Mon, Jan 5")
    pub date: String,
    pub condition: String,
    pub icon: String,
    pub temperature: TemperatureRange,
    pub humidity: f64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

/// Coarse icon family used by any front end to pick a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Rain,
    Snow,
    Thunder,
    Fog,
    Wind,
}

impl WeatherIcon {
    /// Classify a free-text condition ("Light rain", "Thunderstorm", ...).
    /// Anything unrecognised is a cloud.
    pub fn from_condition(condition: &str) -> Self {
        let lower = condition.to_lowercase();
        let has = |needle: &str| lower.contains(needle);

        if has("clear") || has("sunny") {
            WeatherIcon::Sun
        } else if has("rain") || has("drizzle") {
            WeatherIcon::Rain
        } else if has("snow") {
            WeatherIcon::Snow
        } else if has("thunder") || has("lightning") {
            WeatherIcon::Thunder
        } else if has("fog") || has("mist") {
            WeatherIcon::Fog
        } else if has("wind") {
            WeatherIcon::Wind
        } else {
            WeatherIcon::Cloud
        }
    }

    /// Classify an OpenWeatherMap icon code ("01d", "10n", ...).
    pub fn from_icon_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => WeatherIcon::Sun,
            Some("02" | "03" | "04") => WeatherIcon::Cloud,
            Some("09" | "10") => WeatherIcon::Rain,
            Some("11") => WeatherIcon::Thunder,
            Some("13") => WeatherIcon::Snow,
            Some("50") => WeatherIcon::Fog,
            _ => WeatherIcon::Cloud,
        }
    }
}

impl WeatherRecord {
    /// Prefer the provider's icon code; fall back to the condition text.
    pub fn icon_kind(&self) -> WeatherIcon {
        match &self.icon {
            Some(code) => WeatherIcon::from_icon_code(code),
            None => WeatherIcon::from_condition(&self.condition),
        }
    }
}
