//! Liveness handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use sieve::VersionKind;

use crate::server::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let inspector = &state.inspector;
    let store = state.invalidation.store();
    // A poisoned store still answers liveness.
    let model_version = store.current_version(VersionKind::Model).ok();
    let rag_version = store.current_version(VersionKind::Rag).ok();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": inspector.config().response.environment.to_string(),
        "provider": inspector.provider().name(),
        "model": inspector.provider().config().model,
        "cache": {
            "store": store.name(),
            "model_version": model_version,
            "rag_version": rag_version,
        },
        "admin_open": state.invalidation.is_open(),
        "uptime_secs": (Utc::now() - state.started_at).num_seconds(),
    }))
}
