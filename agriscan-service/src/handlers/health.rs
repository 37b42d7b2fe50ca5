use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness probe. Does not contact the upstream model.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "agriscan-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.diagnosis.model(),
    }))
}
