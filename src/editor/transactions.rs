use crate::core::ChainId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
    pub hash: String,
    pub chain_id: Option<ChainId>,
    pub summary: String,
    pub added_at: DateTime<Utc>,
}

/// Transactions submitted from this client, keyed by hash.
#[derive(Debug, Clone, Default)]
pub struct TransactionTracker {
    transactions: Arc<DashMap<String, PendingTransaction>>,
}

impl TransactionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, hash: &str, chain_id: Option<ChainId>, summary: impl Into<String>) {
        let summary = summary.into();
        info!("Tracking transaction {}: {}", hash, summary);
        self.transactions.insert(
            hash.to_string(),
            PendingTransaction {
                hash: hash.to_string(),
                chain_id,
                summary,
                added_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, hash: &str) -> Option<PendingTransaction> {
        self.transactions.get(hash).map(|entry| entry.value().clone())
    }

    /// Tracked transactions, oldest first.
    pub fn pending(&self) -> Vec<PendingTransaction> {
        let mut pending: Vec<PendingTransaction> = self
            .transactions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        pending.sort_by_key(|tx| tx.added_at);
        pending
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
