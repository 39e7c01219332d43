//! User-chosen address pins, in visiting order.

use serde::Serialize;

/// A labeled coordinate added by the user. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    label: String,
    coordinate: (f64, f64),
}

impl Waypoint {
    pub fn new(label: impl Into<String>, coordinate: (f64, f64)) -> Self {
        Self {
            label: label.into(),
            coordinate,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// (latitude, longitude)
    pub fn coordinate(&self) -> (f64, f64) {
        self.coordinate
    }
}

/// Ordered waypoint sequence. Insertion order is visiting order; the only
/// supported removal is [`WaypointStore::clear`].
#[derive(Debug, Clone, Default)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
}

impl WaypointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn all(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut store = WaypointStore::new();
        store.append(Waypoint::new("a", (1.0, 1.0)));
        store.append(Waypoint::new("b", (2.0, 2.0)));
        store.append(Waypoint::new("a", (1.0, 1.0)));

        let labels: Vec<&str> = store.all().iter().map(Waypoint::label).collect();
        assert_eq!(labels, vec!["a", "b", "a"]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = WaypointStore::new();
        store.append(Waypoint::new("a", (1.0, 1.0)));

        store.clear();
        assert!(store.all().is_empty());
        assert_eq!(store.count(), 0);

        store.clear();
        assert!(store.is_empty());
    }
}
