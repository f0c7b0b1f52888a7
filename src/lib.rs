pub mod cli;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod services;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};

use crate::services::generator::AutoGenerator;
use crate::store::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub generator: AutoGenerator,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/transactions", post(handlers::submit_transaction))
        .route("/transactions/test", post(handlers::generate_test_transaction))
        .route("/transactions/auto-mode", post(handlers::toggle_auto_mode))
        .with_state(state)
}
