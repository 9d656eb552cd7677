use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::state::AppState;

// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "active_flows": state.flows.len(),
        "flow_idle_minutes": state.config.flow_idle_timeout.as_secs() / 60,
    }))
}
