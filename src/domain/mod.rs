pub mod transaction;

pub use transaction::{
    Decision, DecisionOutcome, Transaction, TransactionStatus, TransactionSubmission, MAX_ATTEMPTS,
};
