// ═══════════════════════════════════════════════════════════════════
// State Tests: slices, request tokens, live crypto, notification log
// ═══════════════════════════════════════════════════════════════════

mod common;

use common::crypto_record;
use pulse_dashboard_core::models::notification::{AlertMessage, NotificationKind};
use pulse_dashboard_core::state::crypto::LiveCrypto;
use pulse_dashboard_core::state::feed::FEED_CAPACITY;
use pulse_dashboard_core::state::notifications::NotificationLog;
use pulse_dashboard_core::state::policy::{FailurePolicy, FetchOutcome, SlicePolicies};
use pulse_dashboard_core::state::slice::Slice;
use pulse_dashboard_core::state::store::{AppState, Store};

fn alert(n: usize) -> AlertMessage {
    AlertMessage::new(NotificationKind::PriceAlert, format!("Alert {n}"), "moved")
}

// ═══════════════════════════════════════════════════════════════════
// Slice lifecycle
// ═══════════════════════════════════════════════════════════════════

mod slice_lifecycle {
    use super::*;

    #[test]
    fn success_replaces_data_and_clears_loading() {
        let mut slice: Slice<Vec<u32>> = Slice::new(vec![1]);
        let token = slice.begin();
        assert!(slice.is_loading());

        let outcome = slice.succeed(token, vec![2, 3]);
        assert_eq!(outcome, FetchOutcome::Fresh);
        assert!(!slice.is_loading());
        assert_eq!(slice.data(), &vec![2, 3]);
        assert!(slice.error().is_none());
    }

    #[test]
    fn serve_stale_keeps_previous_data() {
        let mut slice: Slice<Vec<u32>> = Slice::default();
        let t = slice.begin();
        slice.succeed(t, vec![7, 8]);

        let t = slice.begin();
        let outcome = slice.fail(t, "offline", FailurePolicy::ServeStale, || vec![0]);
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(slice.data(), &vec![7, 8]);
        assert_eq!(slice.error(), Some("offline"));
        assert!(!slice.is_loading());
    }

    #[test]
    fn fallback_substitutes_data() {
        let mut slice: Slice<Vec<u32>> = Slice::default();
        let t = slice.begin();
        let outcome = slice.fail(t, "offline", FailurePolicy::Fallback, || vec![9, 9]);
        assert_eq!(outcome, FetchOutcome::Fallback);
        assert!(outcome.is_failure());
        assert_eq!(slice.data(), &vec![9, 9]);
        assert_eq!(slice.error(), Some("offline"));
    }

    #[test]
    fn fallback_closure_not_called_for_serve_stale() {
        let mut slice: Slice<Vec<u32>> = Slice::default();
        let t = slice.begin();
        slice.fail(t, "x", FailurePolicy::ServeStale, || panic!("fallback must not run"));
    }

    #[test]
    fn older_token_is_superseded() {
        let mut slice: Slice<u32> = Slice::new(0);
        let first = slice.begin();
        let second = slice.begin();
        assert!(second > first);

        assert_eq!(slice.succeed(first, 1), FetchOutcome::Superseded);
        assert_eq!(slice.data(), &0);
        assert!(slice.is_loading());

        assert_eq!(slice.succeed(second, 2), FetchOutcome::Fresh);
        assert_eq!(slice.data(), &2);
    }

    #[test]
    fn stale_failure_does_not_set_error() {
        let mut slice: Slice<u32> = Slice::new(5);
        let first = slice.begin();
        let _second = slice.begin();
        let outcome = slice.fail(first, "late", FailurePolicy::Fallback, || 0);
        assert_eq!(outcome, FetchOutcome::Superseded);
        assert!(slice.error().is_none());
        assert_eq!(slice.data(), &5);
    }

    #[test]
    fn cancel_drops_in_flight_result() {
        let mut slice: Slice<u32> = Slice::new(1);
        let token = slice.begin();
        slice.cancel();
        assert!(!slice.is_loading());
        assert_eq!(slice.settle(token, Ok::<u32, String>(9), FailurePolicy::Fallback, || 0), FetchOutcome::Superseded);
        assert_eq!(slice.data(), &1);
    }

    #[test]
    fn begin_clears_previous_error() {
        let mut slice: Slice<u32> = Slice::new(1);
        let t = slice.begin();
        slice.fail(t, "boom", FailurePolicy::ServeStale, || 0);
        slice.begin();
        assert!(slice.error().is_none());
    }

    #[test]
    fn uniform_policies() {
        let p = SlicePolicies::uniform(FailurePolicy::ServeStale);
        assert_eq!(p.weather, FailurePolicy::ServeStale);
        assert_eq!(p.news, FailurePolicy::ServeStale);
        assert_eq!(SlicePolicies::default().crypto_details, FailurePolicy::Fallback);
    }
}

// ═══════════════════════════════════════════════════════════════════
// LiveCrypto: concurrent writers
// ═══════════════════════════════════════════════════════════════════

mod live_crypto {
    use super::*;

    fn loaded() -> LiveCrypto {
        let mut crypto = LiveCrypto::new();
        let (t, snap) = crypto.begin();
        crypto.settle(
            t,
            &snap,
            Ok::<_, String>(vec![crypto_record("bitcoin", "Bitcoin", 100.0), crypto_record("ethereum", "Ethereum", 10.0)]),
            FailurePolicy::Fallback,
            Vec::new,
        );
        crypto
    }

    #[test]
    fn tick_updates_price_and_generation() {
        let mut crypto = loaded();
        let before = crypto.generation("bitcoin");
        let gen = crypto.apply_tick("bitcoin", 101.0, 3.0).unwrap();
        assert!(gen > before);
        assert_eq!(crypto.get("bitcoin").unwrap().price, 101.0);
        assert_eq!(crypto.get("bitcoin").unwrap().price_change_24h, 3.0);
    }

    #[test]
    fn tick_on_missing_record_is_ignored() {
        let mut crypto = LiveCrypto::new();
        assert!(crypto.apply_tick("bitcoin", 1.0, 0.0).is_none());
        assert!(crypto.records().is_empty());
    }

    #[test]
    fn tick_during_fetch_survives_settle() {
        let mut crypto = loaded();
        let (token, snap) = crypto.begin();

        // Simulator writes while the request is in flight.
        crypto.apply_tick("bitcoin", 123.0, 4.2);

        let mut fetched = crypto_record("bitcoin", "Bitcoin", 200.0);
        fetched.market_cap = 5.0;
        let outcome = crypto.settle(
            token,
            &snap,
            Ok::<_, String>(vec![fetched, crypto_record("ethereum", "Ethereum", 20.0)]),
            FailurePolicy::Fallback,
            Vec::new,
        );

        assert_eq!(outcome, FetchOutcome::Fresh);
        let btc = crypto.get("bitcoin").unwrap();
        assert_eq!(btc.price, 123.0);
        assert_eq!(btc.price_change_24h, 4.2);
        assert_eq!(btc.market_cap, 5.0);
        // Untouched record takes the fetched price.
        assert_eq!(crypto.get("ethereum").unwrap().price, 20.0);
    }

    #[test]
    fn fetch_without_concurrent_tick_takes_fetched_price() {
        let mut crypto = loaded();
        crypto.apply_tick("bitcoin", 123.0, 4.2);

        let (token, snap) = crypto.begin();
        crypto.settle(
            token,
            &snap,
            Ok::<_, String>(vec![crypto_record("bitcoin", "Bitcoin", 200.0)]),
            FailurePolicy::Fallback,
            Vec::new,
        );
        assert_eq!(crypto.get("bitcoin").unwrap().price, 200.0);
    }

    #[test]
    fn serve_stale_failure_keeps_records() {
        let mut crypto = loaded();
        let (token, snap) = crypto.begin();
        let outcome = crypto.settle(
            token,
            &snap,
            Err::<Vec<_>, _>("offline"),
            FailurePolicy::ServeStale,
            Vec::new,
        );
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(crypto.records().len(), 2);
        assert_eq!(crypto.slice().error(), Some("offline"));
    }

    #[test]
    fn fallback_failure_substitutes_records() {
        let mut crypto = loaded();
        let (token, snap) = crypto.begin();
        let outcome = crypto.settle(
            token,
            &snap,
            Err::<Vec<_>, _>("offline"),
            FailurePolicy::Fallback,
            || vec![crypto_record("solana", "Solana", 1.0)],
        );
        assert_eq!(outcome, FetchOutcome::Fallback);
        assert_eq!(crypto.records().len(), 1);
        assert_eq!(crypto.records()[0].id, "solana");
    }

    #[test]
    fn superseded_settle_changes_nothing() {
        let mut crypto = loaded();
        let (old, snap) = crypto.begin();
        crypto.cancel();
        let outcome = crypto.settle(
            old,
            &snap,
            Ok::<_, String>(Vec::new()),
            FailurePolicy::Fallback,
            Vec::new,
        );
        assert_eq!(outcome, FetchOutcome::Superseded);
        assert_eq!(crypto.records().len(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Notification log
// ═══════════════════════════════════════════════════════════════════

mod notification_log {
    use super::*;

    #[test]
    fn append_prepends_unread_record() {
        let mut log = NotificationLog::new();
        log.append(alert(1));
        let id = log.append(alert(2)).id.clone();

        assert_eq!(log.len(), 2);
        assert_eq!(log.items()[0].id, id);
        assert_eq!(log.items()[0].data.title, "Alert 2");
        assert!(!log.items()[0].read);
        assert!(id.starts_with("notification-"));
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut log = NotificationLog::new();
        for i in 0..(FEED_CAPACITY + 7) {
            log.append(alert(i));
            assert!(log.len() <= FEED_CAPACITY);
        }
        assert_eq!(log.len(), FEED_CAPACITY);
        assert_eq!(log.items()[0].data.title, format!("Alert {}", FEED_CAPACITY + 6));
        assert_eq!(log.items()[FEED_CAPACITY - 1].data.title, "Alert 7");
    }

    #[test]
    fn ids_are_distinct() {
        let mut log = NotificationLog::new();
        for i in 0..10 {
            log.append(alert(i));
        }
        let mut ids: Vec<&str> = log.items().iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn mark_read_and_unread_count() {
        let mut log = NotificationLog::new();
        let id = log.append(alert(1)).id.clone();
        log.append(alert(2));
        assert_eq!(log.unread_count(), 2);

        assert!(log.mark_read(&id));
        assert_eq!(log.unread_count(), 1);
        assert!(!log.mark_read("notification-0-missing"));

        log.mark_all_read();
        assert_eq!(log.unread_count(), 0);
    }

    #[test]
    fn filter_by_kind() {
        let mut log = NotificationLog::new();
        log.append(alert(1));
        log.append(AlertMessage::new(NotificationKind::WeatherAlert, "Weather Alert for Tokyo", "Heat Wave"));

        assert_eq!(log.by_kind(NotificationKind::WeatherAlert).len(), 1);
        assert_eq!(log.by_kind(NotificationKind::PriceAlert).len(), 1);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = NotificationLog::new();
        log.append(alert(1));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn serializes_with_type_field() {
        let mut log = NotificationLog::new();
        log.append(alert(1));
        let json = serde_json::to_value(&log.items()[0]).unwrap();
        assert_eq!(json["type"], "price_alert");
        assert_eq!(json["read"], false);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Store
// ═══════════════════════════════════════════════════════════════════

mod store {
    use super::*;
    use pulse_dashboard_core::services::fallback;

    #[test]
    fn news_feed_is_capped() {
        let mut state = AppState::default();
        for item in fallback::news(FEED_CAPACITY + 5) {
            state.push_news(item);
        }
        assert_eq!(state.news.data().len(), FEED_CAPACITY);
    }

    #[test]
    fn clones_share_state() {
        let store = Store::new();
        let other = store.clone();
        other.write(|s| {
            s.notifications.append(alert(1));
        });
        assert_eq!(store.read(|s| s.notifications.len()), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let store = Store::new();
        let snap = store.snapshot();
        store.write(|s| {
            s.notifications.append(alert(1));
        });
        assert!(snap.notifications.is_empty());
    }

    #[test]
    fn state_serializes_slices() {
        let state = AppState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["weather"]["loading"], false);
        assert!(json["crypto"]["data"].as_array().unwrap().is_empty());
    }
}
