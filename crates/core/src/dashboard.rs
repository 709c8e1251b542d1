use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::errors::CoreError;
use crate::models::crypto::CryptoRecord;
use crate::models::notification::{NotificationKind, NotificationRecord};
use crate::models::preferences::{FavoriteKind, Preferences, Theme};
use crate::models::settings::Settings;
use crate::models::tracked::city_key;
use crate::models::weather::WeatherRecord;
use crate::providers::registry::ProviderSet;
use crate::services::{
    crypto_service::CryptoService, news_service::NewsService, weather_service::WeatherService,
};
use crate::simulator::{SimulatedEventSource, SimulatorHandle};
use crate::state::policy::FetchOutcome;
use crate::state::store::{AppState, Store};
use crate::storage::kv::{FileKeyValueStore, KeyValueStore};
use crate::storage::preferences::PreferenceStore;

/// Favorite records in the order of the favorites lists. Favorites with no
/// record in the current data are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoritesView {
    pub weather: Vec<WeatherRecord>,
    pub crypto: Vec<CryptoRecord>,
}

/// Outcome of one refresh per list slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub weather: FetchOutcome,
    pub crypto: FetchOutcome,
    pub news: Option<FetchOutcome>,
}

struct Inner {
    settings: Settings,
    providers: ProviderSet,
    store: Store,
    weather: WeatherService,
    crypto: CryptoService,
    news: NewsService,
    simulator: SimulatedEventSource,
    preferences: Mutex<PreferenceStore>,
}

/// Main entry point of the dashboard core.
///
/// Owns the shared [`Store`], the fetch services and the preference store.
/// Cheap to clone; clones share all state.
#[derive(Clone)]
#[must_use]
pub struct Dashboard {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (weather, crypto, news, notifications) = self.inner.store.read(|s| {
            (s.weather.data().len(), s.crypto.records().len(), s.news.data().len(), s.notifications.len())
        });
        f.debug_struct("Dashboard")
            .field("providers", &self.inner.providers)
            .field("weather", &weather)
            .field("crypto", &crypto)
            .field("news", &news)
            .field("notifications", &notifications)
            .finish()
    }
}

impl Dashboard {
    /// Build a dashboard from explicit providers and a preference backend.
    /// Preferences are loaded here, once.
    pub fn new(
        settings: Settings,
        providers: ProviderSet,
        backend: Box<dyn KeyValueStore>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;

        let policies = settings.policies;
        let store = Store::new();
        let inner = Inner {
            simulator: SimulatedEventSource::new(store.clone(), settings.simulator.clone())?,
            weather: WeatherService::new(Arc::clone(&providers.weather), policies),
            crypto: CryptoService::new(Arc::clone(&providers.crypto), policies),
            news: NewsService::new(Arc::clone(&providers.news), policies.news, settings.news_fallback_size),
            preferences: Mutex::new(PreferenceStore::load(backend)),
            store,
            providers,
            settings,
        };
        Ok(Self { inner: Arc::new(inner) })
    }

    /// Live HTTP providers and a JSON file at `settings.preferences_path`.
    pub fn from_settings(settings: Settings) -> Result<Self, CoreError> {
        let providers = ProviderSet::from_settings(&settings);
        let backend = FileKeyValueStore::new(settings.preferences_path.clone());
        Self::new(settings, providers, Box::new(backend))
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Fetch every list slice, then start the periodic refresh of weather
    /// and crypto and the simulated event feed.
    ///
    /// The initial fetches run concurrently and have settled when this
    /// returns.
    pub async fn mount(&self) -> DashboardHandle {
        tracing::info!(providers = ?self.inner.providers, "mounting dashboard");
        let summary = self.refresh_all().await;
        tracing::info!(?summary, "initial fetch complete");

        let (stop_tx, stop_rx) = oneshot::channel();
        let refresh = tokio::spawn(refresh_loop(Arc::clone(&self.inner), stop_rx));

        let simulator = self.inner.simulator.clone().start();

        DashboardHandle {
            store: self.inner.store.clone(),
            stop_tx: Some(stop_tx),
            refresh: Some(refresh),
            simulator: Some(simulator),
        }
    }

    /// Refetch weather, crypto and news concurrently.
    pub async fn refresh_all(&self) -> RefreshSummary {
        let store = &self.inner.store;
        let (weather, crypto, news) = tokio::join!(
            self.inner.weather.fetch_all(store),
            self.inner.crypto.fetch_all(store),
            self.inner.news.fetch(store),
        );
        RefreshSummary { weather, crypto, news: Some(news) }
    }

    /// The periodic refresh: weather and crypto only.
    pub async fn refresh_live(&self) -> RefreshSummary {
        self.inner.refresh_live().await
    }

    // ── Details ─────────────────────────────────────────────────────

    /// Load the weather detail view for a tracked city (any spelling that
    /// normalises to a tracked name).
    pub async fn fetch_weather_details(&self, city: &str) -> Result<FetchOutcome, CoreError> {
        self.inner.weather.fetch_details(&self.inner.store, city).await
    }

    /// Load the detail view for a tracked asset id.
    pub async fn fetch_crypto_details(&self, id: &str) -> Result<FetchOutcome, CoreError> {
        self.inner.crypto.fetch_details(&self.inner.store, id).await
    }

    /// Drop the weather detail view; an in-flight fetch for it is discarded.
    pub fn close_weather_details(&self) {
        self.inner.store.write(|s| {
            s.weather_details.cancel();
            *s.weather_details.data_mut() = None;
        });
    }

    pub fn close_crypto_details(&self) {
        self.inner.store.write(|s| {
            s.crypto_details.cancel();
            *s.crypto_details.data_mut() = None;
        });
    }

    // ── Read views ──────────────────────────────────────────────────

    /// A point-in-time copy of all slices and the notification log.
    pub fn snapshot(&self) -> AppState {
        self.inner.store.snapshot()
    }

    #[must_use]
    pub fn favorites_view(&self) -> FavoritesView {
        let prefs = self.preferences();
        self.inner.store.read(|s| FavoritesView {
            weather: prefs
                .favorite_cities
                .iter()
                .filter_map(|fav| {
                    let key = city_key(fav);
                    s.weather.data().iter().find(|w| city_key(&w.name) == key).cloned()
                })
                .collect(),
            crypto: prefs
                .favorite_cryptos
                .iter()
                .filter_map(|id| s.crypto.get(id).cloned())
                .collect(),
        })
    }

    // ── Preferences ─────────────────────────────────────────────────

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.with_preferences(|p| p.preferences().clone())
    }

    /// Add or remove a favorite. Returns whether `key` is a favorite
    /// afterwards.
    pub fn toggle_favorite(&self, kind: FavoriteKind, key: &str) -> Result<bool, CoreError> {
        self.with_preferences(|p| p.toggle(kind, key))
    }

    /// Reorder a favorites list; `order` must be a permutation of it.
    pub fn reorder_favorites(&self, kind: FavoriteKind, order: Vec<String>) -> Result<(), CoreError> {
        self.with_preferences(|p| p.reorder(kind, order))
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), CoreError> {
        self.with_preferences(|p| p.set_theme(theme))
    }

    pub fn import_preferences(&self, prefs: Preferences) -> Result<(), CoreError> {
        self.with_preferences(|p| p.import(prefs))
    }

    fn with_preferences<R>(&self, f: impl FnOnce(&mut PreferenceStore) -> R) -> R {
        let mut guard = self.inner.preferences.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Newest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.inner.store.read(|s| s.notifications.items().to_vec())
    }

    #[must_use]
    pub fn notifications_by_kind(&self, kind: NotificationKind) -> Vec<NotificationRecord> {
        self.inner
            .store
            .read(|s| s.notifications.by_kind(kind).into_iter().cloned().collect())
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.inner.store.read(|s| s.notifications.unread_count())
    }

    /// Returns `false` if no notification has this id.
    pub fn mark_notification_read(&self, id: &str) -> bool {
        self.inner.store.write(|s| s.notifications.mark_read(id))
    }

    pub fn mark_all_notifications_read(&self) {
        self.inner.store.write(|s| s.notifications.mark_all_read());
    }

    pub fn clear_notifications(&self) {
        self.inner.store.write(|s| s.notifications.clear());
    }
}

impl Inner {
    async fn refresh_live(&self) -> RefreshSummary {
        let (weather, crypto) = tokio::join!(
            self.weather.fetch_all(&self.store),
            self.crypto.fetch_all(&self.store),
        );
        RefreshSummary { weather, crypto, news: None }
    }
}

async fn refresh_loop(inner: Arc<Inner>, mut stop_rx: oneshot::Receiver<()>) {
    let period = inner.settings.refresh_interval();
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = timer.tick() => {}
        }
        // A refresh still in flight at unmount is dropped with the loop.
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            summary = inner.refresh_live() => tracing::debug!(?summary, "periodic refresh"),
        }
    }
}

/// A mounted dashboard. [`unmount`](Self::unmount) stops the refresh loop
/// and the simulator and invalidates every in-flight fetch.
#[derive(Debug)]
pub struct DashboardHandle {
    store: Store,
    stop_tx: Option<oneshot::Sender<()>>,
    refresh: Option<JoinHandle<()>>,
    simulator: Option<SimulatorHandle>,
}

impl DashboardHandle {
    pub fn is_running(&self) -> bool {
        self.refresh.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Once this returns, no timer or pending fetch writes to the store.
    pub async fn unmount(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.refresh.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "refresh task ended abnormally");
            }
        }
        if let Some(simulator) = self.simulator.take() {
            simulator.stop().await;
        }
        self.store.write(|s| {
            s.weather.cancel();
            s.weather_details.cancel();
            s.crypto.cancel();
            s.crypto_details.cancel();
            s.news.cancel();
        });
        tracing::info!("dashboard unmounted");
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        if let Some(task) = self.refresh.take() {
            task.abort();
        }
    }
}
