//! Intake path for new and retried submissions.
//!
//! Both the HTTP surface and the synthetic generator come through here, so
//! dedup-by-code and the write-through persist happen in exactly one place.

use crate::domain::{Transaction, TransactionSubmission};
use crate::error::AppError;
use crate::store::SharedStore;

/// Accepts a submission, deduplicating by transaction code.
///
/// A known code is a retry and advances the existing record's attempt
/// counter; an unknown code creates a fresh pending record. The store is
/// persisted before returning; persistence failures are logged and do not
/// undo the in-memory update.
pub async fn submit(
    store: &SharedStore,
    submission: TransactionSubmission,
) -> Result<Transaction, AppError> {
    let code = submission
        .code()
        .ok_or_else(|| {
            AppError::InvalidInput("the submission must include a transaction code".into())
        })?
        .to_string();

    let mut guard = store.write().await;
    let record = match guard.find_by_code_mut(&code) {
        Some(existing) => {
            existing.register_retry()?;
            tracing::info!(
                "retry received for transaction {} (attempt {})",
                existing.code,
                existing.attempts
            );
            existing.clone()
        }
        None => {
            let transaction = Transaction::from_submission(submission)?;
            tracing::info!("transaction received: {}", transaction.code);
            guard.insert(transaction.clone());
            transaction
        }
    };

    if let Err(err) = guard.save().await {
        tracing::error!("failed to persist snapshot after intake: {}", err);
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, TransactionStatus};
    use crate::store::TransactionStore;

    fn submission(code: &str) -> TransactionSubmission {
        TransactionSubmission {
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    async fn store() -> (tempfile::TempDir, SharedStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::load(dir.path().join("transactions.json"))
            .await
            .into_shared();
        (dir, store)
    }

    #[tokio::test]
    async fn resubmission_advances_attempts_without_duplicating() {
        let (_dir, store) = store().await;

        submit(&store, submission("T1")).await.unwrap();
        let second = submit(&store, submission("T1")).await.unwrap();

        assert_eq!(second.attempts, 2);
        assert_eq!(second.status, TransactionStatus::Pending);

        let guard = store.read().await;
        assert_eq!(guard.len(), 1);
    }

    #[tokio::test]
    async fn missing_code_has_no_side_effect() {
        let (_dir, store) = store().await;

        let err = submit(&store, TransactionSubmission::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn retry_reopens_a_temporarily_rejected_record() {
        let (_dir, store) = store().await;

        submit(&store, submission("T1")).await.unwrap();
        store
            .write()
            .await
            .find_by_code_mut("T1")
            .unwrap()
            .decide(Decision::Reject)
            .unwrap();

        let retried = submit(&store, submission("T1")).await.unwrap();
        assert_eq!(retried.status, TransactionStatus::Pending);
        assert_eq!(retried.attempts, 2);
    }

    #[tokio::test]
    async fn retry_on_an_approved_record_is_rejected() {
        let (_dir, store) = store().await;

        submit(&store, submission("T1")).await.unwrap();
        store
            .write()
            .await
            .find_by_code_mut("T1")
            .unwrap()
            .decide(Decision::Approve)
            .unwrap();

        let err = submit(&store, submission("T1")).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let guard = store.read().await;
        assert_eq!(guard.find_by_code("T1").unwrap().attempts, 1);
    }
}
