//! Core of the Pulse dashboard: weather, crypto and news slices fed by
//! third-party APIs, persisted user preferences and a simulated live feed
//! that perturbs prices and raises notifications.

pub mod dashboard;
pub mod errors;
pub mod format;
pub mod models;
pub mod providers;
pub mod services;
pub mod simulator;
pub mod state;
pub mod storage;

pub use dashboard::{Dashboard, DashboardHandle, FavoritesView, RefreshSummary};
pub use errors::CoreError;
pub use models::preferences::{FavoriteKind, Preferences, Theme};
pub use models::settings::Settings;
pub use providers::registry::ProviderSet;
pub use simulator::{SimulatedEventSource, SimulatorConfig, SimulatorHandle};
pub use state::policy::{FailurePolicy, FetchOutcome, SlicePolicies};
pub use state::store::{AppState, Store};
