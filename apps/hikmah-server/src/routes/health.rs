//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;
use crate::storage::LoadWarning;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub library: &'static str,
    /// Slots that were unreadable at startup and started empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_warnings: Vec<LoadWarning>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let running = state.library().is_running();
    let load_warnings = state.load_warnings().to_vec();

    let status = if !running {
        "unavailable"
    } else if load_warnings.is_empty() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        service: "hikmah-server",
        library: if running { "running" } else { "stopped" },
        load_warnings,
    })
}
