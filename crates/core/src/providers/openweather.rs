use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::DEFAULT_OPENWEATHER_URL;
use crate::models::tracked::TrackedCity;
use crate::models::weather::{
    CurrentConditions, ForecastDay, HistoricalPoint, HourlyPoint, TemperatureRange,
    WeatherDetailRecord, WeatherRecord,
};
use super::http::{build_client, get_json};
use super::traits::WeatherProvider;

const PROVIDER: &str = "OpenWeatherMap";

/// Forecast entries are 3 hours apart; 8 of them cover a day.
const ENTRIES_PER_DAY: usize = 8;

/// OpenWeatherMap provider (metric units).
///
/// - **Requires**: API key (`appid` query parameter).
/// - **Endpoints**: `/weather` (current), `/forecast` (5 days, 3h steps)
pub struct OpenWeatherProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_OPENWEATHER_URL, api_key, Duration::from_secs(30))
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: build_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, endpoint: &str, city: &TrackedCity) -> Result<String, CoreError> {
        let key = self.api_key.as_deref().ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: "API key not configured".into(),
        })?;
        Ok(format!(
            "{}/{endpoint}?lat={}&lon={}&units=metric&appid={key}",
            self.base_url, city.lat, city.lon
        ))
    }
}

// ── OpenWeatherMap API response types ───────────────────────────────

#[derive(Deserialize)]
struct Main {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    humidity: f64,
}

#[derive(Deserialize)]
struct Condition {
    main: String,
    icon: String,
}

#[derive(Deserialize, Default)]
struct Wind {
    speed: f64,
}

#[derive(Deserialize)]
pub(crate) struct CurrentResponse {
    main: Main,
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Wind,
}

#[derive(Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: Main,
    weather: Vec<Condition>,
    #[serde(default)]
    wind: Wind,
}

#[derive(Deserialize)]
struct ForecastCity {
    /// Offset from UTC in seconds
    #[serde(default)]
    timezone: i32,
}

#[derive(Deserialize)]
pub(crate) struct ForecastResponse {
    list: Vec<ForecastEntry>,
    #[serde(default)]
    city: Option<ForecastCity>,
}

fn first_condition<'a>(conditions: &'a [Condition], city: &str) -> Result<&'a Condition, CoreError> {
    conditions.first().ok_or_else(|| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("No weather conditions in response for {city}"),
    })
}

pub(crate) fn to_record(city: &TrackedCity, resp: CurrentResponse) -> Result<WeatherRecord, CoreError> {
    let condition = first_condition(&resp.weather, city.name)?;
    Ok(WeatherRecord {
        name: city.name.to_string(),
        temperature: resp.main.temp,
        condition: condition.main.clone(),
        humidity: resp.main.humidity,
        wind_speed: Some(resp.wind.speed),
        icon: Some(condition.icon.clone()),
    })
}

/// A week of synthesized past temperatures ending today. The API has no
/// free history endpoint, so the curve is a fixed sine profile.
pub fn synthesized_history(today: DateTime<Utc>) -> Vec<HistoricalPoint> {
    (0..7)
        .map(|i| {
            let day = today - ChronoDuration::days(6 - i);
            let temperature = (15.0 + ((i as f64 / 7.0) * std::f64::consts::PI).sin() * 5.0).round();
            HistoricalPoint {
                date: day.format("%b %-d").to_string(),
                temperature,
            }
        })
        .collect()
}

pub(crate) fn build_detail(
    city: &TrackedCity,
    current: CurrentResponse,
    forecast: ForecastResponse,
    now: DateTime<Utc>,
) -> Result<WeatherDetailRecord, CoreError> {
    let condition = first_condition(&current.weather, city.name)?;
    let current_conditions = CurrentConditions {
        temperature: current.main.temp,
        feels_like: current.main.feels_like.unwrap_or(current.main.temp),
        humidity: current.main.humidity,
        wind_speed: current.wind.speed,
        condition: condition.main.clone(),
        icon: condition.icon.clone(),
    };

    let offset_secs = forecast.city.as_ref().map(|c| c.timezone).unwrap_or(0);
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    let local = |dt: i64| DateTime::from_timestamp(dt, 0).map(|t| t.with_timezone(&offset));

    let mut hourly = Vec::with_capacity(ENTRIES_PER_DAY);
    for entry in forecast.list.iter().take(ENTRIES_PER_DAY) {
        let (Some(at), Some(cond)) = (local(entry.dt), entry.weather.first()) else {
            continue;
        };
        hourly.push(HourlyPoint {
            time: at.format("%H:%M").to_string(),
            temperature: entry.main.temp,
            condition: cond.main.clone(),
            icon: cond.icon.clone(),
        });
    }

    let mut days = Vec::new();
    for entry in forecast.list.iter().step_by(ENTRIES_PER_DAY) {
        let (Some(at), Some(cond)) = (local(entry.dt), entry.weather.first()) else {
            continue;
        };
        days.push(ForecastDay {
            date: at.format("%a, %b %-d").to_string(),
            condition: cond.main.clone(),
            icon: cond.icon.clone(),
            temperature: TemperatureRange {
                min: entry.main.temp_min.unwrap_or(entry.main.temp),
                max: entry.main.temp_max.unwrap_or(entry.main.temp),
            },
            humidity: entry.main.humidity,
            wind_speed: entry.wind.speed,
        });
    }

    Ok(WeatherDetailRecord {
        city: city.name.to_string(),
        current: current_conditions,
        hourly,
        historical: synthesized_history(now),
        forecast: days,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current(&self, city: &TrackedCity) -> Result<WeatherRecord, CoreError> {
        let url = self.url("weather", city)?;
        let resp: CurrentResponse =
            get_json(&self.client, PROVIDER, &url, &format!("weather data for {}", city.name)).await?;
        to_record(city, resp)
    }

    async fn get_details(&self, city: &TrackedCity) -> Result<WeatherDetailRecord, CoreError> {
        let current_url = self.url("weather", city)?;
        let current: CurrentResponse = get_json(
            &self.client,
            PROVIDER,
            &current_url,
            &format!("current weather for {}", city.name),
        )
        .await?;

        let forecast_url = self.url("forecast", city)?;
        let forecast: ForecastResponse = get_json(
            &self.client,
            PROVIDER,
            &forecast_url,
            &format!("forecast for {}", city.name),
        )
        .await?;

        build_detail(city, current, forecast, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tracked::TRACKED_CITIES;

    const CURRENT: &str = r#"{
        "main": { "temp": 12.3, "feels_like": 10.9, "humidity": 81 },
        "weather": [{ "main": "Rain", "icon": "10d" }],
        "wind": { "speed": 4.6 }
    }"#;

    fn forecast_json(entries: usize) -> String {
        let list: Vec<String> = (0..entries)
            .map(|i| {
                format!(
                    r#"{{ "dt": {}, "main": {{ "temp": {}, "temp_min": 9.0, "temp_max": 14.0, "humidity": 70 }},
                         "weather": [{{ "main": "Clouds", "icon": "04d" }}], "wind": {{ "speed": 3.0 }} }}"#,
                    1_704_067_200 + (i as i64) * 3 * 3600,
                    10 + i
                )
            })
            .collect();
        format!(r#"{{ "list": [{}], "city": {{ "timezone": 0 }} }}"#, list.join(","))
    }

    #[test]
    fn current_response_maps_to_record() {
        let resp: CurrentResponse = serde_json::from_str(CURRENT).unwrap();
        let record = to_record(&TRACKED_CITIES[1], resp).unwrap();
        assert_eq!(record.name, "London");
        assert_eq!(record.condition, "Rain");
        assert_eq!(record.icon.as_deref(), Some("10d"));
        assert_eq!(record.wind_speed, Some(4.6));
    }

    #[test]
    fn detail_slices_forecast_into_hours_and_days() {
        let current: CurrentResponse = serde_json::from_str(CURRENT).unwrap();
        let forecast: ForecastResponse = serde_json::from_str(&forecast_json(40)).unwrap();
        let detail = build_detail(&TRACKED_CITIES[1], current, forecast, Utc::now()).unwrap();

        assert_eq!(detail.hourly.len(), 8);
        assert_eq!(detail.hourly[0].time, "00:00");
        assert_eq!(detail.hourly[1].time, "03:00");
        assert_eq!(detail.forecast.len(), 5);
        assert_eq!(detail.forecast[0].date, "Mon, Jan 1");
        assert_eq!(detail.historical.len(), 7);
        assert_eq!(detail.current.feels_like, 10.9);
    }

    #[test]
    fn empty_conditions_are_rejected() {
        let resp: CurrentResponse = serde_json::from_str(
            r#"{ "main": { "temp": 1.0, "humidity": 5 }, "weather": [] }"#,
        )
        .unwrap();
        assert!(to_record(&TRACKED_CITIES[0], resp).is_err());
    }
}
