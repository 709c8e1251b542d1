use serde::Serialize;
use std::sync::{Arc, Mutex};

use crate::models::crypto::CryptoDetailRecord;
use crate::models::news::NewsRecord;
use crate::models::weather::{WeatherDetailRecord, WeatherRecord};

use super::crypto::LiveCrypto;
use super::feed::{push_front_capped, FEED_CAPACITY};
use super::notifications::NotificationLog;
use super::slice::Slice;

/// Everything the dashboard shows, one slice per data domain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub weather: Slice<Vec<WeatherRecord>>,
    pub weather_details: Slice<Option<WeatherDetailRecord>>,
    pub crypto: LiveCrypto,
    pub crypto_details: Slice<Option<CryptoDetailRecord>>,
    pub news: Slice<Vec<NewsRecord>>,
    pub notifications: NotificationLog,
}

impl AppState {
    /// Prepend a headline, keeping at most [`FEED_CAPACITY`].
    pub fn push_news(&mut self, item: NewsRecord) {
        push_front_capped(self.news.data_mut(), item, FEED_CAPACITY);
    }
}

/// Shared handle to the application state.
///
/// Cheap to clone; every component that needs state receives one explicitly.
/// The lock is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<AppState>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&state)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut AppState) -> R) -> R {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// A point-in-time copy of the whole state.
    pub fn snapshot(&self) -> AppState {
        self.read(AppState::clone)
    }
}
