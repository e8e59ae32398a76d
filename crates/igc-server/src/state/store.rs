//! In-memory track repository and shared application state.

use chrono::{DateTime, Utc};
use igc_core::Track;
use std::sync::{Arc, PoisonError, RwLock};

/// 1-based identifier of a registered track.
pub type TrackId = usize;

/// Append-only, in-memory track repository.
///
/// Ids are positions: the n-th registered track gets id n, so the id space
/// is dense, gapless and never reused. The vector only grows, which is what
/// lets read paths trust an id validated against a count taken earlier.
#[derive(Default)]
pub struct TrackStore {
    tracks: RwLock<Vec<Arc<Track>>>,
}

impl TrackStore {
    /// Append a parsed track and return its newly assigned id.
    ///
    /// Callers parse before appending, so a failed parse never reaches the
    /// store and registration stays all-or-nothing.
    pub fn append(&self, track: Track) -> TrackId {
        let mut tracks = self.tracks.write().unwrap_or_else(PoisonError::into_inner);
        tracks.push(Arc::new(track));
        tracks.len()
    }

    /// Every assigned id in ascending order, `[1, 2, ..., count]`.
    pub fn ids(&self) -> Vec<TrackId> {
        let tracks = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        (1..=tracks.len()).collect()
    }

    /// Look up a track by id. O(1); `None` for 0 or an unassigned id.
    pub fn get(&self, id: TrackId) -> Option<Arc<Track>> {
        let tracks = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        id.checked_sub(1).and_then(|index| tracks.get(index)).cloned()
    }

    /// Number of registered tracks.
    pub fn count(&self) -> usize {
        self.tracks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Application state shared by every request handler.
pub struct AppState {
    pub tracks: TrackStore,
    /// Instant the service came up, the baseline for uptime reporting.
    pub started_at: DateTime<Utc>,
    /// Shared client for fetching referenced track files.
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tracks: TrackStore::default(),
            started_at: Utc::now(),
            http: reqwest::Client::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
