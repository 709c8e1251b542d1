use serde::Serialize;
use std::collections::HashMap;

use crate::models::crypto::CryptoRecord;

use super::policy::{FailurePolicy, FetchOutcome};
use super::slice::{RequestToken, Slice};

/// Per-record generations observed when a fetch was issued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSnapshot(HashMap<String, u64>);

impl GenerationSnapshot {
    fn get(&self, id: &str) -> u64 {
        self.0.get(id).copied().unwrap_or(0)
    }
}

/// The crypto list slice plus a generation counter per record.
///
/// Two writers touch these records: full refetches and simulated price
/// ticks. Every applied write bumps the record's generation. A fetch that
/// settles after a tick landed on a record keeps the tick's price fields for
/// that record and refreshes only the rest.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LiveCrypto {
    #[serde(flatten)]
    slice: Slice<Vec<CryptoRecord>>,
    #[serde(skip)]
    generations: HashMap<String, u64>,
}

impl LiveCrypto {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slice(&self) -> &Slice<Vec<CryptoRecord>> {
        &self.slice
    }

    pub fn records(&self) -> &[CryptoRecord] {
        self.slice.data()
    }

    pub fn get(&self, id: &str) -> Option<&CryptoRecord> {
        self.slice.data().iter().find(|c| c.id == id)
    }

    pub fn generation(&self, id: &str) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    pub fn begin(&mut self) -> (RequestToken, GenerationSnapshot) {
        let token = self.slice.begin();
        (token, GenerationSnapshot(self.generations.clone()))
    }

    pub fn cancel(&mut self) {
        self.slice.cancel();
    }

    /// Settle a fetch. Both live and fallback records go through the same
    /// generation merge.
    pub fn settle<E: std::fmt::Display>(
        &mut self,
        token: RequestToken,
        issued_at: &GenerationSnapshot,
        result: Result<Vec<CryptoRecord>, E>,
        policy: FailurePolicy,
        fallback: impl FnOnce() -> Vec<CryptoRecord>,
    ) -> FetchOutcome {
        if !self.slice.is_current(token) {
            return FetchOutcome::Superseded;
        }

        match (result, policy) {
            (Ok(records), _) => {
                let merged = self.merge(records, issued_at);
                self.slice.succeed(token, merged)
            }
            (Err(e), FailurePolicy::ServeStale) => {
                self.slice.fail(token, e.to_string(), policy, Vec::new)
            }
            (Err(e), FailurePolicy::Fallback) => {
                let merged = self.merge(fallback(), issued_at);
                self.slice.fail(token, e.to_string(), policy, move || merged)
            }
        }
    }

    /// Write a simulated price. Returns the record's new generation, or
    /// `None` if the asset is not in the list yet.
    pub fn apply_tick(&mut self, id: &str, price: f64, price_change_24h: f64) -> Option<u64> {
        let record = self.slice.data_mut().iter_mut().find(|c| c.id == id)?;
        record.price = price;
        record.price_change_24h = price_change_24h;
        Some(self.bump(id))
    }

    fn merge(&mut self, incoming: Vec<CryptoRecord>, issued_at: &GenerationSnapshot) -> Vec<CryptoRecord> {
        let mut merged = Vec::with_capacity(incoming.len());
        for mut record in incoming {
            if self.generation(&record.id) > issued_at.get(&record.id) {
                if let Some(live) = self.get(&record.id) {
                    tracing::debug!(asset = %record.id, "keeping in-flight price tick over fetched price");
                    record.price = live.price;
                    record.price_change_24h = live.price_change_24h;
                }
            }
            self.bump(&record.id);
            merged.push(record);
        }
        merged
    }

    fn bump(&mut self, id: &str) -> u64 {
        let generation = self.generations.entry(id.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }
}
