//! File-backed transaction store.
//!
//! The full ordered collection lives in memory and is rewritten to a single
//! JSON snapshot file after every mutation, so a crash loses at most the
//! in-flight change.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::RwLock;

use crate::domain::Transaction;
use crate::error::AppError;

/// Handle shared between the HTTP handlers, the generator, and the console.
pub type SharedStore = Arc<RwLock<TransactionStore>>;

pub struct TransactionStore {
    path: PathBuf,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Loads the snapshot at `path`, replacing in-memory state wholesale.
    ///
    /// A missing or unreadable snapshot is not fatal: the store starts empty
    /// and the error is reported through the log.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let transactions = match fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Vec<Transaction>>(&contents) {
                Ok(transactions) => {
                    tracing::info!(
                        "loaded {} transactions from {}",
                        transactions.len(),
                        path.display()
                    );
                    transactions
                }
                Err(err) => {
                    tracing::warn!(
                        "snapshot {} is malformed, starting empty: {}",
                        path.display(),
                        err
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(
                    "could not read snapshot {}, starting empty: {}",
                    path.display(),
                    err
                );
                Vec::new()
            }
        };

        Self { path, transactions }
    }

    /// Serializes the full collection and overwrites the snapshot file.
    pub async fn save(&self) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.transactions)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.code == code)
    }

    pub fn find_by_code_mut(&mut self, code: &str) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|t| t.code == code)
    }

    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Empties the collection and persists the empty snapshot immediately.
    pub async fn clear(&mut self) -> Result<(), AppError> {
        self.transactions.clear();
        self.save().await
    }

    /// Records awaiting a decision, in store order.
    pub fn list_pending(&self) -> Vec<&Transaction> {
        self.transactions.iter().filter(|t| t.is_pending()).collect()
    }

    pub fn list_all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, TransactionSubmission};

    fn record(code: &str) -> Transaction {
        Transaction::from_submission(TransactionSubmission {
            code: Some(code.to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::load(dir.path().join("absent.json")).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn malformed_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");
        tokio::fs::write(&path, "not json at all {").await.unwrap();

        let store = TransactionStore::load(&path).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn save_and_reload_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut store = TransactionStore::load(&path).await;
        store.insert(record("A"));
        store.insert(record("B"));
        store
            .find_by_code_mut("A")
            .unwrap()
            .decide(Decision::Approve)
            .unwrap();
        store.save().await.unwrap();

        let reloaded = TransactionStore::load(&path).await;
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.list_all()[0].code, "A");
        assert_eq!(reloaded.list_all()[1].code, "B");

        let a = reloaded.find_by_code("A").unwrap();
        assert!(a.processed);
        assert!(a.processed_at.is_some());
        assert_eq!(reloaded.list_pending().len(), 1);
    }

    #[tokio::test]
    async fn clear_persists_an_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transactions.json");

        let mut store = TransactionStore::load(&path).await;
        store.insert(record("A"));
        store.clear().await.unwrap();
        assert!(store.is_empty());

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
        assert!(parsed.is_empty());
    }

    #[tokio::test]
    async fn pending_listing_skips_decided_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TransactionStore::load(dir.path().join("t.json")).await;
        store.insert(record("A"));
        store.insert(record("B"));
        store.insert(record("C"));
        store
            .find_by_code_mut("B")
            .unwrap()
            .decide(Decision::Reject)
            .unwrap();

        let pending: Vec<&str> = store.list_pending().iter().map(|t| t.code.as_str()).collect();
        assert_eq!(pending, vec!["A", "C"]);
    }
}
