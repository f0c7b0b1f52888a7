//! Processing workflow: pending snapshots, operator decisions, history.

use crate::domain::{Decision, DecisionOutcome, Transaction, TransactionStatus};
use crate::error::AppError;
use crate::store::SharedStore;

/// Per-status counts plus the most recent records, newest first.
#[derive(Debug)]
pub struct HistorySummary {
    pub total: usize,
    pub approved: usize,
    pub permanently_rejected: usize,
    pub pending: usize,
    pub temporarily_rejected: usize,
    pub recent: Vec<Transaction>,
}

const RECENT_HISTORY_LEN: usize = 5;

/// Snapshot of the codes currently awaiting a decision, in store order.
///
/// Submissions that arrive after the snapshot is taken are not part of this
/// processing pass.
pub async fn pending_codes(store: &SharedStore) -> Vec<String> {
    store
        .read()
        .await
        .list_pending()
        .iter()
        .map(|t| t.code.clone())
        .collect()
}

pub async fn get(store: &SharedStore, code: &str) -> Option<Transaction> {
    store.read().await.find_by_code(code).cloned()
}

/// Applies one operator decision and persists the store unless the record
/// was skipped.
pub async fn apply_decision(
    store: &SharedStore,
    code: &str,
    decision: Decision,
) -> Result<DecisionOutcome, AppError> {
    let mut guard = store.write().await;
    let record = guard
        .find_by_code_mut(code)
        .ok_or_else(|| AppError::NotFound(code.to_string()))?;

    let outcome = record.decide(decision)?;

    if outcome != DecisionOutcome::Skipped {
        if let Err(err) = guard.save().await {
            tracing::error!("failed to persist snapshot after decision: {}", err);
        }
    }

    Ok(outcome)
}

/// Empties the store and persists the empty snapshot. The in-memory clear
/// stands even when the persist fails.
pub async fn clear_all(store: &SharedStore) {
    let mut guard = store.write().await;
    if let Err(err) = guard.clear().await {
        tracing::error!("failed to persist snapshot after clear: {}", err);
    }
    tracing::info!("all transactions cleared");
}

pub async fn history(store: &SharedStore) -> HistorySummary {
    let guard = store.read().await;
    let all = guard.list_all();

    let count = |status: TransactionStatus| all.iter().filter(|t| t.status == status).count();

    HistorySummary {
        total: all.len(),
        approved: count(TransactionStatus::Approved),
        permanently_rejected: count(TransactionStatus::PermanentlyRejected),
        pending: all.iter().filter(|t| t.is_pending()).count(),
        temporarily_rejected: count(TransactionStatus::TemporarilyRejected),
        recent: all.iter().rev().take(RECENT_HISTORY_LEN).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionSubmission;
    use crate::services::intake;
    use crate::store::TransactionStore;

    fn submission(code: &str) -> TransactionSubmission {
        TransactionSubmission {
            code: Some(code.to_string()),
            ..Default::default()
        }
    }

    async fn store_with(codes: &[&str]) -> (tempfile::TempDir, SharedStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TransactionStore::load(dir.path().join("transactions.json"))
            .await
            .into_shared();
        for code in codes {
            intake::submit(&store, submission(code)).await.unwrap();
        }
        (dir, store)
    }

    #[tokio::test]
    async fn snapshot_excludes_later_arrivals() {
        let (_dir, store) = store_with(&["A", "B"]).await;

        let snapshot = pending_codes(&store).await;
        intake::submit(&store, submission("C")).await.unwrap();

        assert_eq!(snapshot, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn decision_on_a_vanished_record_reports_not_found() {
        let (_dir, store) = store_with(&["A"]).await;
        clear_all(&store).await;

        let err = apply_decision(&store, "A", Decision::Approve)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn skip_leaves_the_record_in_the_next_pass() {
        let (_dir, store) = store_with(&["A"]).await;

        let outcome = apply_decision(&store, "A", Decision::Skip).await.unwrap();
        assert_eq!(outcome, DecisionOutcome::Skipped);
        assert_eq!(pending_codes(&store).await, vec!["A"]);
    }

    #[tokio::test]
    async fn history_groups_counts_and_lists_newest_first() {
        let (_dir, store) = store_with(&["A", "B", "C", "D", "E", "F"]).await;

        apply_decision(&store, "A", Decision::Approve).await.unwrap();
        apply_decision(&store, "B", Decision::Reject).await.unwrap();

        let summary = history(&store).await;
        assert_eq!(summary.total, 6);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.temporarily_rejected, 1);
        assert_eq!(summary.permanently_rejected, 0);
        assert_eq!(summary.pending, 4);

        let recent: Vec<&str> = summary.recent.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(recent, vec!["F", "E", "D", "C", "B"]);
    }
}
