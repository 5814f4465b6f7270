//! Route handlers for the keep-alive server.

pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health))
}
