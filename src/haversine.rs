//! Straight-line directions provider (stand-in when no routing server is reachable).
//!
//! Uses great-circle distance and an assumed speed for the mode of travel.
//! Less accurate than OSRM (ignores streets) but always available.

use crate::error::ServiceError;
use crate::polyline::Polyline;
use crate::traits::{DirectionsProvider, DirectionsRequest, RouteAlternative, TransportMode};

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate haversine distance between two (lat, lng) points in meters.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Great-circle directions provider.
///
/// Always answers with exactly one alternative: the straight segment from
/// origin to destination.
#[derive(Debug, Clone)]
pub struct StraightLineDirections {
    pub walking_speed_kmh: f64,
    pub cycling_speed_kmh: f64,
    pub driving_speed_kmh: f64,
}

impl Default for StraightLineDirections {
    fn default() -> Self {
        Self {
            walking_speed_kmh: 5.0,
            cycling_speed_kmh: 15.0,
            driving_speed_kmh: 40.0,
        }
    }
}

impl StraightLineDirections {
    fn speed_kmh(&self, transport: TransportMode) -> f64 {
        match transport {
            TransportMode::Walking => self.walking_speed_kmh,
            TransportMode::Cycling => self.cycling_speed_kmh,
            TransportMode::Driving => self.driving_speed_kmh,
        }
    }
}

impl DirectionsProvider for StraightLineDirections {
    fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<Vec<RouteAlternative>, ServiceError> {
        let speed = self.speed_kmh(request.transport);
        if speed <= 0.0 {
            return Err(ServiceError::Other(format!(
                "non-positive speed for {:?}",
                request.transport
            )));
        }

        let geometry = Polyline::new(vec![request.origin, request.destination]);
        let distance_m = geometry.length_m();
        let duration_s = distance_m / 1000.0 / speed * 3600.0;

        Ok(vec![RouteAlternative {
            distance_m,
            duration_s,
            geometry,
        }])
    }
}
