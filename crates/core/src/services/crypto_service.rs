use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::tracked::{find_asset, TRACKED_ASSETS};
use crate::providers::traits::CryptoProvider;
use crate::state::policy::{FetchOutcome, SlicePolicies};
use crate::state::store::Store;

use super::fallback;

/// Fills the crypto list and crypto-detail slices.
pub struct CryptoService {
    provider: Arc<dyn CryptoProvider>,
    policies: SlicePolicies,
}

impl CryptoService {
    pub fn new(provider: Arc<dyn CryptoProvider>, policies: SlicePolicies) -> Self {
        Self { provider, policies }
    }

    /// Refresh the market snapshot for all tracked assets.
    ///
    /// Prices written by the simulator while this request is in flight are
    /// kept (see [`LiveCrypto`](crate::state::crypto::LiveCrypto)).
    pub async fn fetch_all(&self, store: &Store) -> FetchOutcome {
        let (token, issued_at) = store.write(|s| s.crypto.begin());

        let ids: Vec<&str> = TRACKED_ASSETS.iter().map(|a| a.id).collect();
        let result = self.provider.get_markets(&ids).await;

        if let Err(e) = &result {
            tracing::warn!(slice = "crypto", policy = ?self.policies.crypto, error = %e, "fetch failed");
        }
        let outcome = store.write(|s| {
            s.crypto
                .settle(token, &issued_at, result, self.policies.crypto, fallback::crypto_list)
        });
        if outcome == FetchOutcome::Superseded {
            tracing::debug!(slice = "crypto", "discarded superseded response");
        }
        outcome
    }

    /// Load the detail view for one asset id ("bitcoin").
    pub async fn fetch_details(&self, store: &Store, id: &str) -> Result<FetchOutcome, CoreError> {
        let asset = find_asset(id).ok_or_else(|| CoreError::UnknownAsset(id.to_string()))?;

        let token = store.write(|s| {
            if s.crypto_details.data().as_ref().is_some_and(|d| d.id != asset.id) {
                *s.crypto_details.data_mut() = None;
            }
            s.crypto_details.begin()
        });
        let result = self.provider.get_details(asset.id).await.map(Some);

        if let Err(e) = &result {
            tracing::warn!(
                slice = "crypto_details",
                asset = asset.id,
                policy = ?self.policies.crypto_details,
                error = %e,
                "fetch failed"
            );
        }
        Ok(store.write(|s| {
            s.crypto_details.settle(token, result, self.policies.crypto_details, || {
                Some(fallback::crypto_details(asset, chrono::Utc::now()))
            })
        }))
    }
}
