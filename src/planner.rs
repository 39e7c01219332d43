//! Route planning over consecutive waypoint pairs.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Error;
use crate::polyline::Polyline;
use crate::traits::{DirectionsProvider, DirectionsRequest, RouteAlternative, TransportMode};
use crate::waypoints::Waypoint;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub transport: TransportMode,
    /// Ask the directions service for alternative paths.
    pub alternatives: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            transport: TransportMode::Walking,
            alternatives: true,
        }
    }
}

/// The shortest path found between `waypoints[index]` and `waypoints[index + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSegment {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub distance_m: f64,
    pub duration_s: f64,
    /// Number of alternatives the service returned for this pair.
    pub alternatives: usize,
    pub polyline: Polyline,
}

/// Per-pair result. A failed pair never aborts the others.
pub type SegmentOutcome = Result<RouteSegment, Error>;

/// Index of the minimum-distance alternative.
///
/// Ties keep the first one seen: a later alternative only wins when it is
/// strictly shorter.
pub fn select_shortest(alternatives: &[RouteAlternative]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (index, alternative) in alternatives.iter().enumerate() {
        best = match best {
            None => Some(index),
            Some(current) if alternative.distance_m < alternatives[current].distance_m => {
                Some(index)
            }
            keep => keep,
        };
    }
    best
}

#[derive(Debug, Clone)]
pub struct RoutePlanner<D> {
    directions: D,
    options: PlanOptions,
}

impl<D: DirectionsProvider> RoutePlanner<D> {
    pub fn new(directions: D, options: PlanOptions) -> Self {
        Self {
            directions,
            options,
        }
    }

    /// Lazily plans each leg in waypoint order, one request per pulled item.
    pub fn segments<'a>(
        &'a self,
        waypoints: &'a [Waypoint],
    ) -> Result<impl Iterator<Item = SegmentOutcome> + 'a, Error> {
        ensure_plannable(waypoints)?;
        Ok(waypoints
            .windows(2)
            .enumerate()
            .map(move |(index, pair)| self.plan_segment(index, &pair[0], &pair[1])))
    }

    /// Plans one leg for a (origin, destination) pair.
    pub fn plan_segment(&self, index: usize, from: &Waypoint, to: &Waypoint) -> SegmentOutcome {
        let request = DirectionsRequest {
            origin: from.coordinate(),
            destination: to.coordinate(),
            transport: self.options.transport,
            alternatives: self.options.alternatives,
        };

        let alternatives = self.directions.directions(&request).map_err(|source| {
            tracing::warn!(segment = index, error = %source, "directions request failed");
            Error::DirectionsRequestFailed {
                segment: index,
                source,
            }
        })?;

        let count = alternatives.len();
        let Some(best) = select_shortest(&alternatives) else {
            tracing::info!(segment = index, "no route alternatives");
            return Err(Error::DirectionsUnavailable { segment: index });
        };
        let Some(chosen) = alternatives.into_iter().nth(best) else {
            return Err(Error::DirectionsUnavailable { segment: index });
        };

        tracing::debug!(
            segment = index,
            alternatives = count,
            distance_m = chosen.distance_m,
            "selected shortest alternative"
        );

        Ok(RouteSegment {
            index,
            from: from.label().to_string(),
            to: to.label().to_string(),
            distance_m: chosen.distance_m,
            duration_s: chosen.duration_s,
            alternatives: count,
            polyline: chosen.geometry,
        })
    }
}

impl<D: DirectionsProvider + Sync> RoutePlanner<D> {
    /// Plans every leg concurrently. Outcomes come back in waypoint order.
    pub fn plan(&self, waypoints: &[Waypoint]) -> Result<Vec<SegmentOutcome>, Error> {
        ensure_plannable(waypoints)?;
        tracing::debug!(legs = waypoints.len() - 1, "planning route");

        Ok(waypoints
            .par_windows(2)
            .enumerate()
            .map(|(index, pair)| self.plan_segment(index, &pair[0], &pair[1]))
            .collect())
    }
}

fn ensure_plannable(waypoints: &[Waypoint]) -> Result<(), Error> {
    if waypoints.len() < 2 {
        return Err(Error::InsufficientWaypoints {
            count: waypoints.len(),
        });
    }
    Ok(())
}
