// ═══════════════════════════════════════════════════════════════════
// Error Tests: CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use pulse_dashboard_core::errors::{redact_query, CoreError};

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn api() {
        let err = CoreError::Api {
            provider: "CoinGecko".into(),
            message: "Failed to fetch crypto data: HTTP 429 Too Many Requests".into(),
        };
        assert_eq!(
            err.to_string(),
            "API error (CoinGecko): Failed to fetch crypto data: HTTP 429 Too Many Requests"
        );
    }

    #[test]
    fn network() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn unknown_city() {
        let err = CoreError::UnknownCity("Atlantis".into());
        assert_eq!(err.to_string(), "Unknown city: Atlantis");
    }

    #[test]
    fn unknown_asset() {
        let err = CoreError::UnknownAsset("dogecoin".into());
        assert_eq!(err.to_string(), "Unknown asset: dogecoin");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("not a permutation".into());
        assert_eq!(err.to_string(), "Validation failed: not a permutation");
    }

    #[test]
    fn config() {
        let err = CoreError::Config("refresh interval must be > 0".into());
        assert_eq!(err.to_string(), "Invalid configuration: refresh interval must be > 0");
    }

    #[test]
    fn storage_variants() {
        assert_eq!(
            CoreError::Serialization("x".into()).to_string(),
            "Serialization error: x"
        );
        assert_eq!(
            CoreError::Deserialization("y".into()).to_string(),
            "Deserialization error: y"
        );
        assert_eq!(CoreError::FileIO("z".into()).to_string(), "File I/O error: z");
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("denied")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn question_mark_propagates_io() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}

// ── Query redaction ─────────────────────────────────────────────────

mod redaction {
    use super::*;

    #[test]
    fn strips_query_string() {
        let msg = "error sending request for url (https://newsapi.org/v2/top-headlines?category=business&apiKey=secret)";
        let redacted = redact_query(msg);
        assert!(!redacted.contains("secret"));
        assert!(redacted.starts_with("error sending request for url (https://newsapi.org/v2/top-headlines?"));
    }

    #[test]
    fn leaves_plain_messages_alone() {
        assert_eq!(redact_query("timed out"), "timed out");
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

#[test]
fn core_error_is_send_sync_and_std_error() {
    fn assert_bounds<T: Send + Sync + std::error::Error + 'static>() {}
    assert_bounds::<CoreError>();
}
