//! REST API routes.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::{meta, tracks};
use crate::state::AppState;

/// Create the API router.
///
/// Everything lives under `/igcinfo`; the path shape of the track routes is
/// part of the wire contract, including the single-segment id and field
/// parameters.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/igcinfo/api", get(meta::service_info))
        .route(
            "/igcinfo/api/igc",
            post(tracks::register_track).get(tracks::list_track_ids),
        )
        .route("/igcinfo/api/igc/:id", get(tracks::get_track))
        .route("/igcinfo/api/igc/:id/:field", get(tracks::get_track_field))
}
