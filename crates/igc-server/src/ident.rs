//! Validation of track ids taken from request paths.

use crate::state::TrackId;

/// Why an id string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// Not a non-empty run of ASCII digits.
    #[error("id must be a number")]
    Malformed,
    /// All digits, but too large for the platform integer.
    #[error("could not get id from idString")]
    Conversion,
    /// Converted fine but outside the assigned range.
    #[error("no such id exists")]
    OutOfRange,
}

/// Validate a raw path segment against the current number of tracks.
///
/// Runs three checks in order and reports the first failure: digit syntax,
/// integer conversion, then the `1..=count` range. The syntax check comes
/// first so that conversion failure can only mean overflow. Zero is well
/// formed and converts, it just never names a track.
pub fn validate(raw: &str, count: usize) -> Result<TrackId, IdError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IdError::Malformed);
    }

    let id: TrackId = raw.parse().map_err(|_| IdError::Conversion)?;

    if id == 0 || id > count {
        return Err(IdError::OutOfRange);
    }
    Ok(id)
}
