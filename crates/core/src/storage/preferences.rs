use crate::errors::CoreError;
use crate::models::preferences::{FavoriteKind, Preferences, Theme};

use super::kv::KeyValueStore;

/// Fixed storage key of the preferences blob.
pub const PREFERENCES_KEY: &str = "userPreferences";

/// Process-wide user preferences with write-through persistence.
///
/// Loaded once at construction. Every mutation re-serializes the whole
/// record. If that write fails the in-memory change stays and the error is
/// returned, so the caller can surface it.
pub struct PreferenceStore {
    backend: Box<dyn KeyValueStore>,
    prefs: Preferences,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("prefs", &self.prefs)
            .finish()
    }
}

impl PreferenceStore {
    /// Load from `backend`. A missing, unreadable or malformed blob yields
    /// the defaults (no favorites, system theme).
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let mut prefs = match backend.get(PREFERENCES_KEY) {
            Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to parse saved preferences; using defaults");
                Preferences::default()
            }),
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved preferences; using defaults");
                Preferences::default()
            }
        };
        prefs.dedup();
        Self { backend, prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn favorites(&self, kind: FavoriteKind) -> &[String] {
        self.prefs.favorites(kind)
    }

    /// Add `key` if absent, remove it if present.
    /// Returns whether `key` is a favorite afterwards.
    pub fn toggle(&mut self, kind: FavoriteKind, key: &str) -> Result<bool, CoreError> {
        let now_favorite = self.prefs.toggle(kind, key);
        tracing::debug!(%kind, key, now_favorite, "toggled favorite");
        self.persist()?;
        Ok(now_favorite)
    }

    /// Replace the order of one favorites list with a permutation of it.
    pub fn reorder(&mut self, kind: FavoriteKind, order: Vec<String>) -> Result<(), CoreError> {
        self.prefs.reorder(kind, order)?;
        self.persist()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), CoreError> {
        self.prefs.theme = theme;
        self.persist()
    }

    /// Replace the whole record, e.g. from an exported blob.
    pub fn import(&mut self, mut prefs: Preferences) -> Result<(), CoreError> {
        prefs.dedup();
        self.prefs = prefs;
        self.persist()
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        let value = serde_json::to_value(&self.prefs)
            .map_err(|e| CoreError::Serialization(e.to_string()))?;
        self.backend.set(PREFERENCES_KEY, value)
    }
}
