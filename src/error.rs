//! Error types for the address-to-route pipeline.

use thiserror::Error;

/// Dialog text shown when an address cannot be resolved.
pub const GEOCODING_FAILED_MESSAGE: &str = "Request is not available. Please, try again.";

/// Dialog text shown when a leg has no route alternatives.
pub const ROUTE_UNAVAILABLE_MESSAGE: &str = "Route is not available.";

/// Failure reported by an external collaborator (geocoder, directions, location).
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("{0}")]
    Other(String),
}

/// Pipeline error kinds.
///
/// `DirectionsUnavailable` and `DirectionsRequestFailed` are kept apart so the
/// caller can choose a display policy for each; see [`Error::user_message`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not geocode {address:?}: {reason}")]
    GeocodingFailed { address: String, reason: String },

    #[error("no route alternatives for segment {segment}")]
    DirectionsUnavailable { segment: usize },

    #[error("directions request for segment {segment} failed: {source}")]
    DirectionsRequestFailed {
        segment: usize,
        #[source]
        source: ServiceError,
    },

    #[error("location update failed: {0}")]
    LocationUpdateFailed(#[source] ServiceError),

    #[error("route planning needs at least 2 waypoints, got {count}")]
    InsufficientWaypoints { count: usize },

    #[error("route planning is offered from {required} waypoints, have {count}")]
    RouteNotReady { count: usize, required: usize },
}

impl Error {
    /// Text for a confirmation-only dialog, or `None` for log-only failures.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            Error::GeocodingFailed { .. } => Some(GEOCODING_FAILED_MESSAGE),
            Error::DirectionsUnavailable { .. } => Some(ROUTE_UNAVAILABLE_MESSAGE),
            Error::InsufficientWaypoints { .. } | Error::RouteNotReady { .. } => {
                Some(ROUTE_UNAVAILABLE_MESSAGE)
            }
            Error::DirectionsRequestFailed { .. } | Error::LocationUpdateFailed(_) => None,
        }
    }
}
