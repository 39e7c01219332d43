//! waypoint-router
//!
//! Geocode typed addresses into waypoints, plan walking directions between
//! consecutive waypoints, and keep the shortest alternative of each leg as a
//! polyline overlay. Collaborator services sit behind the traits in
//! [`traits`].

pub mod config;
pub mod error;
pub mod geocoding;
pub mod haversine;
pub mod location;
pub mod nominatim;
pub mod osrm;
pub mod osrm_data;
pub mod planner;
pub mod polyline;
pub mod session;
pub mod traits;
pub mod waypoints;

pub use error::{Error, ServiceError};
pub use planner::{PlanOptions, RoutePlanner, RouteSegment};
pub use session::{Delivery, PlannerState, Session};
pub use waypoints::{Waypoint, WaypointStore};
