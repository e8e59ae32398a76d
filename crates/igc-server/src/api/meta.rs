//! Service metadata endpoint.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::state::AppState;
use crate::uptime::Uptime;

pub const INFO: &str = "Service for igc tracks.";
pub const VERSION: &str = "v1";

/// Response body for `GET /igcinfo/api`. The capitalised member names are
/// part of the wire contract.
#[derive(Debug, Serialize)]
pub struct ServiceMeta {
    #[serde(rename = "Uptime")]
    pub uptime: String,
    #[serde(rename = "Info")]
    pub info: &'static str,
    #[serde(rename = "Version")]
    pub version: &'static str,
}

/// Identity and uptime of the service itself.
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceMeta> {
    let uptime = Uptime::between(state.started_at.fixed_offset(), Utc::now().fixed_offset());
    Json(ServiceMeta {
        uptime: uptime.to_string(),
        info: INFO,
        version: VERSION,
    })
}
