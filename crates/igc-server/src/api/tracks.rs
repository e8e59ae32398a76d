//! Track registration and lookup handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::{AppState, TrackId};
use crate::{fields, ident};
use igc_core::Track;

// === Request/Response types ===

/// Body of `POST /igcinfo/api/igc`. Unknown members are rejected so a
/// mistyped key fails loudly instead of registering garbage.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub url: String,
}

/// Full per-track response for `GET /igcinfo/api/igc/:id`.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    #[serde(rename = "H_date")]
    pub h_date: DateTime<Utc>,
    pub pilot: String,
    pub glider: String,
    pub glider_id: String,
    pub track_length: f64,
}

impl TrackResponse {
    fn from_track(track: &Track) -> Self {
        Self {
            h_date: fields::header_date(track),
            pilot: track.pilot.clone(),
            glider: track.glider_type.clone(),
            glider_id: track.glider_id.clone(),
            track_length: track.task.distance(),
        }
    }
}

// === Handlers ===

/// Fetch the referenced IGC file, parse it and append it to the store;
/// answer with the newly assigned id.
///
/// The store lock is only held for the append itself. Fetching and parsing,
/// the slow parts, run with no lock held, and a failure there leaves the
/// repository untouched.
pub async fn register_track(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TrackId>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::InvalidJson)?;
    let url = Url::parse(&request.url).map_err(|_| ApiError::InvalidUrl)?;

    let raw = fetch_reference(&state.http, url).await?;
    let track = igc_core::parse(&raw)?;

    let id = state.tracks.append(track);
    tracing::info!(id, "Registered track");
    Ok(Json(id))
}

/// Every assigned track id, ascending.
pub async fn list_track_ids(State(state): State<Arc<AppState>>) -> Json<Vec<TrackId>> {
    Json(state.tracks.ids())
}

/// Full metadata for one track.
pub async fn get_track(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<TrackResponse>, ApiError> {
    let track = lookup(&state, &raw_id)?;
    Ok(Json(TrackResponse::from_track(&track)))
}

/// One projected field of one track, served as plain text.
pub async fn get_track_field(
    State(state): State<Arc<AppState>>,
    Path((raw_id, field)): Path<(String, String)>,
) -> Result<String, ApiError> {
    let track = lookup(&state, &raw_id)?;
    Ok(fields::project(&track, &field)?)
}

async fn fetch_reference(client: &reqwest::Client, url: Url) -> Result<String, ApiError> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Validate a raw path id against the current count and fetch its track.
///
/// The store only grows, so an id that passes the range check cannot be
/// invalidated before the `get` that follows.
fn lookup(state: &AppState, raw_id: &str) -> Result<Arc<Track>, ApiError> {
    let id = ident::validate(raw_id, state.tracks.count())?;
    state.tracks.get(id).ok_or(ApiError::NoSuchId)
}
