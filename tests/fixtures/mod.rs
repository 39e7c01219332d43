//! Test fixtures for waypoint-router.
//!
//! Real, walkable Las Vegas Strip locations (from OpenStreetMap).

pub mod strip_locations;

pub use strip_locations::*;
