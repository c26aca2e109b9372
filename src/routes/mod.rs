//! Route modules for Polizas Server

pub mod batches;
pub mod health;
pub mod pages;

use axum::Router;

use crate::state::AppState;

/// Assemble the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(pages::router())
        .merge(health::router())
        .nest("/api/v1/batches", batches::router(&state))
        .with_state(state)
}
