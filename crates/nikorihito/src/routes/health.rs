//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use database::mute;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: String,
    pub muted: bool,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        muted: mute::is_muted(&state.db).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use database::Database;

    #[tokio::test]
    async fn test_health_reports_mute() {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path()).unwrap());
        let state = AppState::new(db.clone());

        let Json(body) = health(State(state.clone())).await;
        assert_eq!(body.status, "ok");
        assert!(!body.muted);

        mute::set_muted(&db, true).await.unwrap();
        let Json(body) = health(State(state)).await;
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"status": "ok", "muted": true})
        );
    }
}
