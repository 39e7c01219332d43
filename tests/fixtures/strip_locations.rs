//! Las Vegas Strip locations within walking distance of each other.
//!
//! Coordinates sourced from OpenStreetMap. They are routable with the
//! OSRM Nevada extract and the foot profile.

use waypoint_router::Waypoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.name, self.coords())
    }
}

/// South-to-north walk along the Strip.
pub const STRIP_WALK: &[Location] = &[
    Location::new("MGM Grand", 36.1023654, -115.1688720),
    Location::new("New York-New York", 36.1023, -115.1745),
    Location::new("Bellagio", 36.1126, -115.1767),
    Location::new("Caesars Palace", 36.1162, -115.1745),
    Location::new("Wynn Las Vegas", 36.1263781, -115.1658180),
];

pub fn strip_waypoints(count: usize) -> Vec<Waypoint> {
    STRIP_WALK.iter().take(count).map(Location::waypoint).collect()
}
