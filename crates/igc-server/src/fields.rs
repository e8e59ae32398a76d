//! Projection of a track onto a single named field.

use chrono::{DateTime, NaiveTime, Utc};
use igc_core::Track;

/// A field name outside the projection table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid field")]
pub struct UnknownField(pub String);

/// Project one field of a track to the plain-text form it is served in.
///
/// Names are matched exactly, case included, and anything else fails closed
/// with the offending name. The table must stay in lockstep with the full
/// track response in the API layer.
pub fn project(track: &Track, field: &str) -> Result<String, UnknownField> {
    match field {
        "pilot" => Ok(track.pilot.clone()),
        "glider" => Ok(track.glider_type.clone()),
        "glider_id" => Ok(track.glider_id.clone()),
        "track_length" => Ok(track.task.distance().to_string()),
        "H_date" => Ok(header_date(track).to_string()),
        _ => Err(UnknownField(field.to_string())),
    }
}

/// The recording date widened to a UTC timestamp at midnight.
pub fn header_date(track: &Track) -> DateTime<Utc> {
    track.date.and_time(NaiveTime::MIN).and_utc()
}
