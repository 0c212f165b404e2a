// src/routes/health.rs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{db, AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResp {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

pub async fn banner() -> &'static str {
    "Placement Dashboard Backend is running!"
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    let db_healthy = match db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "database health check failed");
            false
        }
    };

    Json(HealthResp {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}
