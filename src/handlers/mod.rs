use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::domain::{Transaction, TransactionSubmission};
use crate::error::AppError;
use crate::services::intake;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (total, pending) = {
        let guard = state.store.read().await;
        (guard.len(), guard.list_pending().len())
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "transactions": total,
        "pending": pending,
        "auto_mode": state.generator.is_active().await,
    }))
}

/// `POST /transactions` — intake for new and retried submissions.
pub async fn submit_transaction(
    State(state): State<AppState>,
    payload: Option<Json<TransactionSubmission>>,
) -> Result<impl IntoResponse, AppError> {
    let Json(submission) = payload.ok_or_else(|| {
        AppError::InvalidInput("the request body must be a transaction submission".into())
    })?;

    let record = intake::submit(&state.store, submission).await?;

    Ok(Json(json!({
        "message": "transaction received",
        "code": record.code,
    })))
}

/// `POST /transactions/test` — generates and stores one synthetic record.
pub async fn generate_test_transaction(
    State(state): State<AppState>,
) -> Result<Json<Transaction>, AppError> {
    let record = state.generator.generate_once().await?;
    Ok(Json(record))
}

#[derive(Debug, Default, Deserialize)]
pub struct AutoModeRequest {
    #[serde(default)]
    pub enable: bool,
}

/// `POST /transactions/auto-mode` — toggles the periodic generator.
///
/// An absent body disables, mirroring the enable flag defaulting to false.
pub async fn toggle_auto_mode(
    State(state): State<AppState>,
    payload: Option<Json<AutoModeRequest>>,
) -> impl IntoResponse {
    let enable = payload.map(|Json(req)| req.enable).unwrap_or_default();

    let message = if enable {
        if state.generator.start().await {
            "auto mode enabled"
        } else {
            "auto mode already active"
        }
    } else if state.generator.stop().await {
        "auto mode disabled"
    } else {
        "auto mode not active"
    };

    Json(json!({ "message": message }))
}
