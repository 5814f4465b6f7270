//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Document store.
    pub db: Arc<Database>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}
