use thiserror::Error;

/// Unified error type for the pulse-dashboard-core library.
///
/// Network failures inside a slice fetch are *not* surfaced through this type:
/// they are recorded on the slice itself. `CoreError` is returned for lookups
/// that are rejected up front, storage problems and invalid input.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Lookup ──────────────────────────────────────────────────────
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Input / Configuration ───────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL, and both weather and news keys
        // travel as query parameters.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` so API keys never reach logs or
/// slice error strings.
pub fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
