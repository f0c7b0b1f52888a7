//! Periodic synthetic-transaction generator for exercising the intake path.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::{Transaction, TransactionSubmission};
use crate::error::AppError;
use crate::services::intake;
use crate::store::SharedStore;

/// Spawns a background task that feeds one synthetic pending transaction
/// through the intake contract per period. Start and stop are idempotent.
#[derive(Clone)]
pub struct AutoGenerator {
    store: SharedStore,
    period: Duration,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AutoGenerator {
    pub fn new(store: SharedStore, period: Duration) -> Self {
        Self {
            store,
            period,
            task: Arc::new(Mutex::new(None)),
        }
    }

    /// Builds a synthetic submission: random code and amount, fixed
    /// currency, country, and instrument defaults.
    pub fn synthetic_submission() -> TransactionSubmission {
        let cents = 5_000 + (rand::random::<u64>() % 50_000) as i64;
        TransactionSubmission {
            code: Some(format!("TEST{}", rand::random::<u32>() % 10_000)),
            tx_type: Some("REC".to_string()),
            brand: Some("VISA".to_string()),
            currency: Some("USD".to_string()),
            country: Some("EC".to_string()),
            amount: Some(Decimal::new(cents, 2)),
            unique_transaction_code: Some(Uuid::new_v4().simple().to_string()),
            card_number: Some("4532123456789012".to_string()),
            card_expiry: Some("2025-12-31".to_string()),
            bank_swift: Some("PICHECEQ".to_string()),
            iban_account: Some("EC012345678901234567890".to_string()),
            deferred: Some(false),
        }
    }

    /// Generates and stores one synthetic transaction immediately.
    pub async fn generate_once(&self) -> Result<Transaction, AppError> {
        intake::submit(&self.store, Self::synthetic_submission()).await
    }

    /// Starts the periodic task. Returns false when already running.
    ///
    /// The first synthetic transaction is produced right away, then one per
    /// period until `stop`.
    pub async fn start(&self) -> bool {
        let mut task = self.task.lock().await;
        if task.is_some() {
            return false;
        }

        let generator = self.clone();
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(generator.period);
            loop {
                ticker.tick().await;
                match generator.generate_once().await {
                    Ok(tx) => tracing::info!("generated synthetic transaction {}", tx.code),
                    Err(err) => {
                        tracing::error!("failed to generate synthetic transaction: {}", err)
                    }
                }
            }
        }));
        tracing::info!("auto-generation started (period {:?})", self.period);
        true
    }

    /// Stops the periodic task. Returns false when not running.
    pub async fn stop(&self) -> bool {
        match self.task.lock().await.take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("auto-generation stopped");
                true
            }
            None => false,
        }
    }

    pub async fn is_active(&self) -> bool {
        self.task.lock().await.is_some()
    }
}
