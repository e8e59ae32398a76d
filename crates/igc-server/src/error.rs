//! Request failure taxonomy for the track API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::fields::UnknownField;
use crate::ident::IdError;

/// Everything a track request can be rejected with.
///
/// Each variant carries its exact wire message. The id errors keep the
/// syntax, conversion and range stages apart on purpose: a string of digits
/// that overflows integer conversion is an internal error, not bad input.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request body is not the expected JSON object.
    #[error("Invalid json object")]
    InvalidJson,
    /// The `url` member does not parse as an absolute URL.
    #[error("Invalid url")]
    InvalidUrl,
    /// The referenced file could not be fetched or parsed as IGC.
    #[error("Bad request: {0}")]
    BadTrack(String),
    /// Path id is not a run of digits.
    #[error("Bad request: id must be a number")]
    MalformedId,
    /// Path id is well formed but no track has it.
    #[error("Bad request: no such id exists")]
    NoSuchId,
    /// Path id is all digits yet failed integer conversion.
    #[error("Internal server error: could not get id from idString")]
    IdConversion,
    /// Field name not in the projection table.
    #[error("Bad request: {0} is not a valid field.")]
    UnknownField(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::IdConversion => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        } else {
            tracing::debug!("rejected request: {self}");
        }
        (status, format!("{self}\n")).into_response()
    }
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        match err {
            IdError::Malformed => Self::MalformedId,
            IdError::Conversion => Self::IdConversion,
            IdError::OutOfRange => Self::NoSuchId,
        }
    }
}

impl From<UnknownField> for ApiError {
    fn from(err: UnknownField) -> Self {
        Self::UnknownField(err.0)
    }
}

impl From<igc_core::ParseError> for ApiError {
    fn from(err: igc_core::ParseError) -> Self {
        Self::BadTrack(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::BadTrack(err.to_string())
    }
}
