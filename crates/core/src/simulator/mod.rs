//! Simulated real-time feed: price ticks, weather alerts and breaking news
//! written straight into the shared store on independent timers.

pub mod events;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::errors::CoreError;
use crate::state::store::Store;

pub use events::{random_headline, PriceMove, WeatherAlert, ALERT_CONDITIONS};

/// Timer periods and probabilities of the simulated feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub price_interval_ms: u64,
    pub weather_interval_ms: u64,
    pub news_interval_ms: u64,
    /// Largest absolute price move per tick, in percent
    pub max_price_move_pct: f64,
    /// Moves strictly above this raise a price alert
    pub price_alert_threshold_pct: f64,
    pub weather_alert_probability: f64,
    pub news_probability: f64,
    /// Fixed seed for reproducible runs; entropy when unset
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            price_interval_ms: 8_000,
            weather_interval_ms: 45_000,
            news_interval_ms: 60_000,
            max_price_move_pct: 0.4,
            price_alert_threshold_pct: 0.3,
            weather_alert_probability: 0.15,
            news_probability: 0.2,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.price_interval_ms == 0 || self.weather_interval_ms == 0 || self.news_interval_ms == 0 {
            return Err(CoreError::Config("simulator intervals must be > 0".into()));
        }
        if !(self.max_price_move_pct.is_finite() && self.max_price_move_pct > 0.0) {
            return Err(CoreError::Config("max price move must be a positive number".into()));
        }
        if !self.price_alert_threshold_pct.is_finite() || self.price_alert_threshold_pct < 0.0 {
            return Err(CoreError::Config("price alert threshold must be >= 0".into()));
        }
        for (name, p) in [
            ("weather alert probability", self.weather_alert_probability),
            ("news probability", self.news_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::Config(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        Ok(())
    }

    /// One RNG per timer so each feed's sequence depends only on the seed.
    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}

/// A simulator that has not been started yet.
#[derive(Debug, Clone)]
pub struct SimulatedEventSource {
    store: Store,
    config: SimulatorConfig,
}

impl SimulatedEventSource {
    /// Fails with [`CoreError::Config`] when `config` does not validate.
    pub fn new(store: Store, config: SimulatorConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Spawn the timer task. The first tick of each timer fires one full
    /// period after start.
    pub fn start(self) -> SimulatorHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        tracing::info!(seed = ?self.config.seed, "simulator started");
        let task = tokio::spawn(self.run(stop_rx));
        SimulatorHandle { stop_tx: Some(stop_tx), task: Some(task) }
    }

    async fn run(self, mut stop_rx: oneshot::Receiver<()>) {
        let cfg = &self.config;
        let mut price_rng = cfg.rng(0);
        let mut weather_rng = cfg.rng(1);
        let mut news_rng = cfg.rng(2);

        let mut price_timer = periodic(cfg.price_interval_ms);
        let mut weather_timer = periodic(cfg.weather_interval_ms);
        let mut news_timer = periodic(cfg.news_interval_ms);

        loop {
            tokio::select! {
                biased;
                _ = &mut stop_rx => break,
                _ = price_timer.tick() => {
                    let mv = PriceMove::random(&mut price_rng, cfg.max_price_move_pct);
                    let alerted = self.store.write(|s| mv.apply(s, cfg.price_alert_threshold_pct));
                    tracing::debug!(asset = mv.asset.id, delta_pct = mv.delta_pct, alerted, "price tick");
                }
                _ = weather_timer.tick() => {
                    if let Some(alert) = WeatherAlert::random(&mut weather_rng, cfg.weather_alert_probability) {
                        tracing::debug!(city = alert.city.name, condition = alert.condition, "weather alert");
                        self.store.write(|s| {
                            s.notifications.append(alert.message());
                        });
                    }
                }
                _ = news_timer.tick() => {
                    if let Some(item) = random_headline(&mut news_rng, cfg.news_probability) {
                        tracing::debug!(title = %item.title, "breaking news");
                        self.store.write(|s| s.push_news(item));
                    }
                }
            }
        }
    }
}

fn periodic(period_ms: u64) -> tokio::time::Interval {
    let period = Duration::from_millis(period_ms);
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// A running simulator. Dropping it without [`stop`](Self::stop) also ends
/// the task, but without waiting for it.
#[derive(Debug)]
pub struct SimulatorHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SimulatorHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel all timers. Once this returns no further simulated write
    /// reaches the store.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "simulator task ended abnormally");
            }
        }
        tracing::info!("simulator stopped");
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
