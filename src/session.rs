//! Pipeline state: waypoints, overlay, readiness and the reset generation.
//!
//! The session is owned by a single thread. Work issued elsewhere (geocoding,
//! route planning) is tagged with the [`Generation`] current at issue time and
//! handed back through [`Session::apply_resolution`] or
//! [`Session::apply_route`]; results from before the last reset are dropped.

use crate::error::Error;
use crate::geocoding::{GeocodingAdapter, Resolution};
use crate::planner::{RoutePlanner, SegmentOutcome};
use crate::polyline::Polyline;
use crate::traits::{DirectionsProvider, Geocoder};
use crate::waypoints::{Waypoint, WaypointStore};

/// Reset counter. Bumped by every [`Session::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}

/// Whether route planning is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlannerState {
    #[default]
    Collecting,
    RouteReady,
}

impl PlannerState {
    /// Route and reset controls are shown only once a route can be planned.
    pub fn controls_visible(self) -> bool {
        self == PlannerState::RouteReady
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Waypoint count at which the session becomes [`PlannerState::RouteReady`].
    pub route_ready_threshold: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            route_ready_threshold: 3,
        }
    }
}

/// Result of handing asynchronous work back to the session.
#[derive(Debug, PartialEq)]
pub enum Delivery<T> {
    Applied(T),
    /// Issued before the last reset; ignored.
    Discarded,
}

impl<T> Delivery<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Delivery::Applied(_))
    }
}

/// Planned legs for the waypoints of one generation.
#[derive(Debug)]
pub struct RoutePlan {
    pub generation: Generation,
    pub outcomes: Vec<SegmentOutcome>,
}

#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    store: WaypointStore,
    overlays: Vec<Polyline>,
    state: PlannerState,
    generation: Generation,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let mut session = Self {
            config,
            ..Self::default()
        };
        session.refresh_state();
        session
    }

    /// Readiness follows the waypoint count against the threshold.
    fn refresh_state(&mut self) {
        let state = if self.store.count() >= self.config.route_ready_threshold {
            PlannerState::RouteReady
        } else {
            PlannerState::Collecting
        };
        if state != self.state {
            tracing::info!(waypoints = self.store.count(), ?state, "planner state changed");
            self.state = state;
        }
    }

    pub fn state(&self) -> PlannerState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        self.store.all()
    }

    /// Polylines drawn so far in this generation.
    pub fn overlays(&self) -> &[Polyline] {
        &self.overlays
    }

    /// Appends a waypoint resolved in `generation`.
    pub fn apply_waypoint(
        &mut self,
        generation: Generation,
        waypoint: Waypoint,
    ) -> Delivery<()> {
        if generation != self.generation {
            tracing::warn!(label = waypoint.label(), "discarding waypoint from before reset");
            return Delivery::Discarded;
        }

        self.store.append(waypoint);
        self.refresh_state();
        Delivery::Applied(())
    }

    /// Applies a detached geocode. Failures from the current generation are
    /// returned; stale ones are dropped whatever their outcome.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> Result<Delivery<()>, Error> {
        if resolution.generation != self.generation {
            tracing::warn!(address = %resolution.address, "discarding geocode from before reset");
            return Ok(Delivery::Discarded);
        }
        let waypoint = resolution.result?;
        Ok(self.apply_waypoint(resolution.generation, waypoint))
    }

    /// Geocodes `address` on the calling thread and appends the result.
    pub fn add_address<G: Geocoder>(
        &mut self,
        adapter: &GeocodingAdapter<G>,
        address: &str,
    ) -> Result<Waypoint, Error> {
        let waypoint = adapter.resolve(address)?;
        self.apply_waypoint(self.generation, waypoint.clone());
        Ok(waypoint)
    }

    /// Plans the current waypoints. Only offered in [`PlannerState::RouteReady`].
    pub fn plan_route<D: DirectionsProvider + Sync>(
        &self,
        planner: &RoutePlanner<D>,
    ) -> Result<RoutePlan, Error> {
        if self.state != PlannerState::RouteReady {
            return Err(Error::RouteNotReady {
                count: self.store.count(),
                required: self.config.route_ready_threshold,
            });
        }

        Ok(RoutePlan {
            generation: self.generation,
            outcomes: planner.plan(self.store.all())?,
        })
    }

    /// Draws the successful legs of `plan` and returns the failed ones.
    pub fn apply_route(&mut self, plan: RoutePlan) -> Delivery<Vec<Error>> {
        if plan.generation != self.generation {
            tracing::warn!(legs = plan.outcomes.len(), "discarding route from before reset");
            return Delivery::Discarded;
        }

        let mut failures = Vec::new();
        for outcome in plan.outcomes {
            match outcome {
                Ok(segment) => self.overlays.push(segment.polyline),
                Err(err) => failures.push(err),
            }
        }
        Delivery::Applied(failures)
    }

    /// Clears waypoints and overlays and invalidates in-flight work.
    pub fn reset(&mut self) {
        self.store.clear();
        self.overlays.clear();
        self.generation = self.generation.next();
        self.refresh_state();
        tracing::info!(generation = self.generation.0, "session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waypoint(label: &str) -> Waypoint {
        Waypoint::new(label, (0.0, 0.0))
    }

    #[test]
    fn test_ready_exactly_at_threshold() {
        let mut session = Session::new(SessionConfig::default());
        let generation = session.generation();

        session.apply_waypoint(generation, waypoint("a"));
        assert_eq!(session.state(), PlannerState::Collecting);
        session.apply_waypoint(generation, waypoint("b"));
        assert!(!session.state().controls_visible());
        session.apply_waypoint(generation, waypoint("c"));
        assert_eq!(session.state(), PlannerState::RouteReady);
        session.apply_waypoint(generation, waypoint("d"));
        assert_eq!(session.state(), PlannerState::RouteReady);
    }

    #[test]
    fn test_reset_returns_to_collecting() {
        let mut session = Session::new(SessionConfig {
            route_ready_threshold: 1,
        });
        session.apply_waypoint(session.generation(), waypoint("a"));
        assert!(session.state().controls_visible());

        let before = session.generation();
        session.reset();
        assert_eq!(session.state(), PlannerState::Collecting);
        assert!(session.waypoints().is_empty());
        assert!(session.generation() > before);

        session.reset();
        assert!(session.waypoints().is_empty());
    }

    #[test]
    fn test_zero_threshold_is_always_ready() {
        let mut session = Session::new(SessionConfig {
            route_ready_threshold: 0,
        });
        assert_eq!(session.state(), PlannerState::RouteReady);

        session.apply_waypoint(session.generation(), waypoint("a"));
        assert_eq!(session.state(), PlannerState::RouteReady);

        session.reset();
        assert_eq!(session.state(), PlannerState::RouteReady);
        assert!(session.waypoints().is_empty());
    }

    #[test]
    fn test_stale_waypoint_discarded() {
        let mut session = Session::default();
        let stale = session.generation();
        session.reset();

        assert_eq!(session.apply_waypoint(stale, waypoint("late")), Delivery::Discarded);
        assert!(session.waypoints().is_empty());
    }

    #[test]
    fn test_stale_resolution_error_dropped() {
        let mut session = Session::default();
        let stale = session.generation();
        session.reset();

        let resolution = Resolution {
            generation: stale,
            address: "###".to_string(),
            result: Err(Error::GeocodingFailed {
                address: "###".to_string(),
                reason: "no results".to_string(),
            }),
        };
        assert!(matches!(session.apply_resolution(resolution), Ok(Delivery::Discarded)));
    }

    #[test]
    fn test_apply_route_splits_outcomes() {
        let mut session = Session::default();
        let plan = RoutePlan {
            generation: session.generation(),
            outcomes: vec![
                Err(Error::DirectionsUnavailable { segment: 0 }),
                Ok(crate::planner::RouteSegment {
                    index: 1,
                    from: "b".to_string(),
                    to: "c".to_string(),
                    distance_m: 10.0,
                    duration_s: 8.0,
                    alternatives: 1,
                    polyline: Polyline::new(vec![(0.0, 0.0), (0.0, 0.0001)]),
                }),
            ],
        };

        match session.apply_route(plan) {
            Delivery::Applied(failures) => assert_eq!(failures.len(), 1),
            Delivery::Discarded => panic!("plan should apply"),
        }
        assert_eq!(session.overlays().len(), 1);

        session.reset();
        assert!(session.overlays().is_empty());
    }
}
