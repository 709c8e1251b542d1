use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl std::str::FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(CoreError::ValidationError(format!("unknown theme: {other}"))),
        }
    }
}

/// Which favorites collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteKind {
    /// City display names ("London")
    Cities,
    /// CoinGecko ids ("bitcoin")
    Cryptos,
}

impl std::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FavoriteKind::Cities => write!(f, "cities"),
            FavoriteKind::Cryptos => write!(f, "cryptos"),
        }
    }
}

/// The persisted user preferences record.
///
/// Serialized with camelCase keys and no version field; unknown or missing
/// fields fall back to defaults so older blobs still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub favorite_cities: Vec<String>,
    pub favorite_cryptos: Vec<String>,
    pub theme: Theme,
}

impl Preferences {
    pub fn favorites(&self, kind: FavoriteKind) -> &[String] {
        match kind {
            FavoriteKind::Cities => &self.favorite_cities,
            FavoriteKind::Cryptos => &self.favorite_cryptos,
        }
    }

    fn favorites_mut(&mut self, kind: FavoriteKind) -> &mut Vec<String> {
        match kind {
            FavoriteKind::Cities => &mut self.favorite_cities,
            FavoriteKind::Cryptos => &mut self.favorite_cryptos,
        }
    }

    pub fn is_favorite(&self, kind: FavoriteKind, key: &str) -> bool {
        self.favorites(kind).iter().any(|k| k == key)
    }

    /// Drop repeated keys from both collections, keeping the first
    /// occurrence of each.
    pub fn dedup(&mut self) {
        for list in [&mut self.favorite_cities, &mut self.favorite_cryptos] {
            let mut seen = std::collections::HashSet::new();
            list.retain(|k| seen.insert(k.clone()));
        }
    }

    /// Append `key` if absent, remove it if present.
    /// Returns `true` when the key is a favorite afterwards.
    pub fn toggle(&mut self, kind: FavoriteKind, key: &str) -> bool {
        let list = self.favorites_mut(kind);
        match list.iter().position(|k| k == key) {
            Some(idx) => {
                list.remove(idx);
                false
            }
            None => {
                list.push(key.to_string());
                true
            }
        }
    }

    /// Replace the ordering of one collection.
    ///
    /// `order` must be a permutation of the current members: same length,
    /// same elements, no duplicates. Otherwise nothing changes.
    pub fn reorder(&mut self, kind: FavoriteKind, order: Vec<String>) -> Result<(), CoreError> {
        let current = self.favorites(kind);
        if order.len() != current.len() {
            return Err(CoreError::ValidationError(format!(
                "reorder of {kind} expects {} items, got {}",
                current.len(),
                order.len()
            )));
        }

        let mut expected: Vec<&String> = current.iter().collect();
        let mut given: Vec<&String> = order.iter().collect();
        expected.sort();
        given.sort();
        if expected != given {
            return Err(CoreError::ValidationError(format!(
                "reorder of {kind} is not a permutation of the current favorites"
            )));
        }

        *self.favorites_mut(kind) = order;
        Ok(())
    }
}
