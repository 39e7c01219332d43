//! Collaborator interfaces for the address-to-route pipeline.
//!
//! Geocoding, directions and location services are external. Concrete
//! adapters live in `osrm`, `nominatim` and `haversine`; tests supply mocks.

use std::sync::mpsc::Receiver;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::polyline::Polyline;

/// A geocoding result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    /// Place name (building, venue, street address).
    pub name: Option<String>,
    /// City, town or village.
    pub locality: Option<String>,
    /// Single-line formatted address as returned by the service.
    pub formatted: Option<String>,
    /// Location (lat, lng).
    pub coordinate: Option<(f64, f64)>,
}

/// Converts free text into candidate placemarks, best match first.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Vec<Placemark>, ServiceError>;
}

/// Converts a coordinate (lat, lng) into candidate placemarks, best match first.
pub trait ReverseGeocoder {
    fn reverse_geocode(&self, coordinate: (f64, f64)) -> Result<Vec<Placemark>, ServiceError>;
}

/// Transport mode for a directions request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransportMode {
    #[default]
    Walking,
    Cycling,
    Driving,
}

impl TransportMode {
    /// OSRM profile name serving this mode.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TransportMode::Walking => "foot",
            TransportMode::Cycling => "bicycle",
            TransportMode::Driving => "car",
        }
    }
}

/// One origin/destination directions query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionsRequest {
    pub origin: (f64, f64),
    pub destination: (f64, f64),
    pub transport: TransportMode,
    pub alternatives: bool,
}

/// One candidate path between an origin and a destination.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAlternative {
    /// Total distance in meters.
    pub distance_m: f64,
    /// Expected travel time in seconds.
    pub duration_s: f64,
    pub geometry: Polyline,
}

/// Computes paths between two coordinates.
///
/// An empty `Ok` vector means the service answered but found no route.
pub trait DirectionsProvider {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteAlternative>, ServiceError>;
}

/// An item on a location subscription.
#[derive(Debug)]
pub enum LocationEvent {
    Update((f64, f64)),
    Failed(ServiceError),
}

/// Device location service.
pub trait LocationSource {
    /// Asks for permission to read the location. Called once before subscribing.
    fn request_authorization(&self) -> Result<(), ServiceError>;

    /// Starts continuous updates. The stream ends when the sender is dropped.
    fn subscribe(&self) -> Receiver<LocationEvent>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Vec<Placemark>, ServiceError> {
        (**self).geocode(address)
    }
}

impl<T: ReverseGeocoder + ?Sized> ReverseGeocoder for &T {
    fn reverse_geocode(&self, coordinate: (f64, f64)) -> Result<Vec<Placemark>, ServiceError> {
        (**self).reverse_geocode(coordinate)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        (**self).directions(request)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Box<T> {
    fn geocode(&self, address: &str) -> Result<Vec<Placemark>, ServiceError> {
        (**self).geocode(address)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for Box<T> {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        (**self).directions(request)
    }
}
