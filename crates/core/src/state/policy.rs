use serde::{Deserialize, Serialize};

/// What a slice does with its data when a fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep whatever the last successful fetch produced (possibly nothing).
    ServeStale,
    /// Replace data with the slice's built-in fallback dataset.
    #[default]
    Fallback,
}

/// One failure policy per data slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicePolicies {
    pub weather: FailurePolicy,
    pub weather_details: FailurePolicy,
    pub crypto: FailurePolicy,
    pub crypto_details: FailurePolicy,
    pub news: FailurePolicy,
}

impl SlicePolicies {
    /// Every slice uses the same policy.
    pub fn uniform(policy: FailurePolicy) -> Self {
        Self {
            weather: policy,
            weather_details: policy,
            crypto: policy,
            crypto_details: policy,
            news: policy,
        }
    }
}

/// How a fetch ended, from the slice's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Live data was stored.
    Fresh,
    /// The fetch failed and fallback data was stored.
    Fallback,
    /// The fetch failed and previous data was kept.
    Stale,
    /// A newer request (or a cancel) was issued meanwhile; the result was dropped.
    Superseded,
}

impl FetchOutcome {
    pub fn is_failure(self) -> bool {
        matches!(self, FetchOutcome::Fallback | FetchOutcome::Stale)
    }
}
