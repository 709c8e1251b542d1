use std::sync::Arc;

use crate::providers::traits::NewsProvider;
use crate::state::feed::FEED_CAPACITY;
use crate::state::policy::{FailurePolicy, FetchOutcome};
use crate::state::store::Store;

use super::fallback;

/// Fills the news slice.
pub struct NewsService {
    provider: Arc<dyn NewsProvider>,
    policy: FailurePolicy,
    fallback_size: usize,
}

impl NewsService {
    pub fn new(provider: Arc<dyn NewsProvider>, policy: FailurePolicy, fallback_size: usize) -> Self {
        Self {
            provider,
            policy,
            fallback_size: fallback_size.min(FEED_CAPACITY),
        }
    }

    /// Replace the headline list. Live results are capped at
    /// [`FEED_CAPACITY`] whatever the provider returns.
    pub async fn fetch(&self, store: &Store) -> FetchOutcome {
        let token = store.write(|s| s.news.begin());
        let result = self.provider.get_headlines().await.map(|mut items| {
            items.truncate(FEED_CAPACITY);
            items
        });

        if let Err(e) = &result {
            tracing::warn!(slice = "news", policy = ?self.policy, error = %e, "fetch failed");
        }
        let size = self.fallback_size;
        let outcome = store.write(|s| s.news.settle(token, result, self.policy, || fallback::news(size)));
        if outcome == FetchOutcome::Superseded {
            tracing::debug!(slice = "news", "discarded superseded response");
        }
        outcome
    }
}
