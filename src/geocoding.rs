//! Turns typed addresses into waypoints.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::error::Error;
use crate::session::Generation;
use crate::traits::Geocoder;
use crate::waypoints::Waypoint;

/// Outcome of a detached geocode, tagged with the generation it was issued in.
#[derive(Debug)]
pub struct Resolution {
    pub generation: Generation,
    pub address: String,
    pub result: Result<Waypoint, Error>,
}

/// Wraps a [`Geocoder`] and builds waypoints from its first candidate.
#[derive(Debug)]
pub struct GeocodingAdapter<G> {
    geocoder: Arc<G>,
}

impl<G> Clone for GeocodingAdapter<G> {
    fn clone(&self) -> Self {
        Self {
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<G: Geocoder> GeocodingAdapter<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
        }
    }

    /// Resolves `address` to a waypoint labeled with the raw input text.
    ///
    /// Only the first candidate is considered. No retry.
    pub fn resolve(&self, address: &str) -> Result<Waypoint, Error> {
        let placemarks = self.geocoder.geocode(address).map_err(|err| {
            tracing::warn!(address, error = %err, "geocoding request failed");
            Error::GeocodingFailed {
                address: address.to_string(),
                reason: err.to_string(),
            }
        })?;

        let Some(first) = placemarks.into_iter().next() else {
            return Err(Error::GeocodingFailed {
                address: address.to_string(),
                reason: "no results".to_string(),
            });
        };

        let coordinate = first.coordinate.ok_or_else(|| Error::GeocodingFailed {
            address: address.to_string(),
            reason: "first result has no location".to_string(),
        })?;

        tracing::debug!(address, lat = coordinate.0, lng = coordinate.1, "address resolved");
        Ok(Waypoint::new(address, coordinate))
    }
}

impl<G: Geocoder + Send + Sync + 'static> GeocodingAdapter<G> {
    /// Resolves on the rayon pool and sends the outcome to `sender`.
    ///
    /// Overlapping calls may complete in any order. A dropped receiver is
    /// ignored.
    pub fn spawn_resolve(
        &self,
        generation: Generation,
        address: String,
        sender: Sender<Resolution>,
    ) {
        let adapter = self.clone();
        rayon::spawn(move || {
            let result = adapter.resolve(&address);
            let _ = sender.send(Resolution {
                generation,
                address,
                result,
            });
        });
    }
}
