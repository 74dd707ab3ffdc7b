//! Liveness and readiness probes. Unauthenticated by design; the database
//! probe issues an explicit ping on the long-lived connection.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use crate::state::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn health_live() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

pub async fn health_ready(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            error!("readiness probe failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready" })),
            )
        }
    }
}

pub async fn health_database(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "database": "up" }))),
        Err(err) => {
            error!("database probe failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "database": "down" })),
            )
        }
    }
}

pub async fn health_detailed(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database_up = match state.db.ping().await {
        Ok(()) => true,
        Err(err) => {
            error!("database probe failed: {err}");
            false
        }
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if database_up { "ok" } else { "degraded" },
        "timestamp": Utc::now().to_rfc3339(),
        "checks": {
            "database": if database_up { "up" } else { "down" },
        },
    });

    (status, Json(body))
}
