//! Transaction domain entity and the retry/approval state machine.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Rejections at or beyond this attempt count become permanent.
pub const MAX_ATTEMPTS: u32 = 3;

/// Lifecycle states of a transaction.
///
/// `Pending` may move to any of the other three; `TemporarilyRejected` moves
/// back to `Pending` through a retry submission. `Approved` and
/// `PermanentlyRejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Approved,
    TemporarilyRejected,
    PermanentlyRejected,
}

/// Operator decision for a pending transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
    Skip,
}

/// What a decision did to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approved,
    TemporarilyRejected,
    PermanentlyRejected,
    Skipped,
}

/// Incoming submission payload. Only `code` is required; the harness stores
/// whatever the client sent for the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionSubmission {
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub brand: Option<String>,
    pub currency: Option<String>,
    pub country: Option<String>,
    pub amount: Option<Decimal>,
    pub unique_transaction_code: Option<String>,
    pub card_number: Option<String>,
    pub card_expiry: Option<String>,
    pub bank_swift: Option<String>,
    pub iban_account: Option<String>,
    pub deferred: Option<bool>,
}

impl TransactionSubmission {
    /// The submission's transaction code, if present and non-blank.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// A stored transaction record. The store owns all instances; intake and the
/// processing workflow mutate them in place through the methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub code: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub brand: String,
    pub currency: String,
    pub country: String,
    pub amount: Decimal,
    pub unique_transaction_code: String,
    pub card_number: String,
    pub card_expiry: String,
    pub bank_swift: String,
    pub iban_account: String,
    pub deferred: bool,
    pub submitted_at: DateTime<Utc>,
    pub last_attempt_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub attempts: u32,
    pub processed: bool,
}

impl Transaction {
    /// Initializes a fresh record from a first-time submission.
    pub fn from_submission(submission: TransactionSubmission) -> Result<Self, AppError> {
        let code = submission
            .code()
            .ok_or_else(|| {
                AppError::InvalidInput("the submission must include a transaction code".into())
            })?
            .to_string();

        let now = Utc::now();
        Ok(Self {
            code,
            tx_type: submission.tx_type.unwrap_or_default(),
            brand: submission.brand.unwrap_or_default(),
            currency: submission.currency.unwrap_or_default(),
            country: submission.country.unwrap_or_default(),
            amount: submission.amount.unwrap_or_default(),
            unique_transaction_code: submission.unique_transaction_code.unwrap_or_default(),
            card_number: submission.card_number.unwrap_or_default(),
            card_expiry: submission.card_expiry.unwrap_or_default(),
            bank_swift: submission.bank_swift.unwrap_or_default(),
            iban_account: submission.iban_account.unwrap_or_default(),
            deferred: submission.deferred.unwrap_or_default(),
            submitted_at: now,
            last_attempt_at: now,
            processed_at: None,
            status: TransactionStatus::Pending,
            attempts: 1,
            processed: false,
        })
    }

    /// Records a retry submission: one more attempt, back to pending.
    ///
    /// Terminal records are not retriable; a resubmission against one is a
    /// client error rather than a silent reset.
    pub fn register_retry(&mut self) -> Result<(), AppError> {
        if self.is_terminal() {
            return Err(AppError::InvalidInput(format!(
                "transaction {} already reached a final state and cannot be retried",
                self.code
            )));
        }

        self.attempts += 1;
        self.last_attempt_at = Utc::now();
        self.status = TransactionStatus::Pending;
        Ok(())
    }

    /// Applies an operator decision.
    ///
    /// A rejection at `MAX_ATTEMPTS` or beyond is final; below that the
    /// record is only parked until the submitter retries. Skip never mutates.
    pub fn decide(&mut self, decision: Decision) -> Result<DecisionOutcome, AppError> {
        match decision {
            Decision::Skip => Ok(DecisionOutcome::Skipped),
            Decision::Approve => {
                self.ensure_open()?;
                self.status = TransactionStatus::Approved;
                self.processed = true;
                self.processed_at = Some(Utc::now());
                Ok(DecisionOutcome::Approved)
            }
            Decision::Reject => {
                self.ensure_open()?;
                if self.attempts >= MAX_ATTEMPTS {
                    self.status = TransactionStatus::PermanentlyRejected;
                    self.processed = true;
                    self.processed_at = Some(Utc::now());
                    Ok(DecisionOutcome::PermanentlyRejected)
                } else {
                    self.status = TransactionStatus::TemporarilyRejected;
                    Ok(DecisionOutcome::TemporarilyRejected)
                }
            }
        }
    }

    fn ensure_open(&self) -> Result<(), AppError> {
        if self.is_terminal() {
            return Err(AppError::InvalidInput(format!(
                "transaction {} already reached a final state",
                self.code
            )));
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            TransactionStatus::Approved | TransactionStatus::PermanentlyRejected
        )
    }

    /// A record the processing workflow should pick up.
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending && !self.processed
    }
}
