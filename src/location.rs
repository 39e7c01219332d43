//! Live location tracking with a reverse-geocoded "Name, City" label.

use crate::error::Error;
use crate::traits::{LocationEvent, LocationSource, Placemark, ReverseGeocoder};

/// Label for the most recent location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocationLabel {
    /// No update yet, or the last update could not be named.
    #[default]
    Unresolved,
    Resolved(String),
}

impl LocationLabel {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LocationLabel::Unresolved => None,
            LocationLabel::Resolved(label) => Some(label),
        }
    }
}

/// What happens to earlier markers when a new location arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarkerPolicy {
    /// Every update adds a marker.
    #[default]
    Accumulate,
    /// Only the latest location is marked.
    ReplaceLast,
}

/// Formats "Name, City" from a placemark. `None` if either part is missing.
pub fn format_label(placemark: &Placemark) -> Option<String> {
    let name = placemark.name.as_deref()?;
    let city = placemark.locality.as_deref()?;
    Some(format!("{}, {}", name, city))
}

#[derive(Debug)]
pub struct LiveLocationLabeler<R> {
    geocoder: R,
    policy: MarkerPolicy,
    label: LocationLabel,
    center: Option<(f64, f64)>,
    markers: Vec<(f64, f64)>,
}

impl<R: ReverseGeocoder> LiveLocationLabeler<R> {
    pub fn new(geocoder: R, policy: MarkerPolicy) -> Self {
        Self {
            geocoder,
            policy,
            label: LocationLabel::Unresolved,
            center: None,
            markers: Vec::new(),
        }
    }

    pub fn label(&self) -> &LocationLabel {
        &self.label
    }

    /// Where the map is centered, if any update has arrived.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.center
    }

    pub fn markers(&self) -> &[(f64, f64)] {
        &self.markers
    }

    /// Requests authorization once, then consumes updates until the source
    /// closes its stream.
    pub fn start<S: LocationSource>(&mut self, source: &S) -> Result<(), Error> {
        source
            .request_authorization()
            .map_err(Error::LocationUpdateFailed)?;

        for event in source.subscribe() {
            self.handle_event(event);
        }
        tracing::debug!("location stream closed");
        Ok(())
    }

    /// Applies one event from the location stream. Failures are logged only.
    pub fn handle_event(&mut self, event: LocationEvent) {
        match event {
            LocationEvent::Update(coordinate) => self.handle_update(coordinate),
            LocationEvent::Failed(err) => {
                tracing::warn!(error = %Error::LocationUpdateFailed(err), "location update failed");
            }
        }
    }

    fn handle_update(&mut self, coordinate: (f64, f64)) {
        self.center = Some(coordinate);
        if self.policy == MarkerPolicy::ReplaceLast {
            self.markers.clear();
        }
        self.markers.push(coordinate);

        self.label = match self.geocoder.reverse_geocode(coordinate) {
            Ok(placemarks) => placemarks
                .first()
                .and_then(format_label)
                .map_or(LocationLabel::Unresolved, LocationLabel::Resolved),
            Err(err) => {
                tracing::warn!(error = %err, "reverse geocoding failed");
                LocationLabel::Unresolved
            }
        };
        tracing::debug!(label = ?self.label, "location updated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;

    struct Cupertino;

    impl ReverseGeocoder for Cupertino {
        fn reverse_geocode(&self, coordinate: (f64, f64)) -> Result<Vec<Placemark>, ServiceError> {
            if coordinate.0 < 0.0 {
                return Err(ServiceError::Status(503));
            }
            let name = (coordinate.1 != 0.0).then(|| "Apple Park".to_string());
            Ok(vec![Placemark {
                name,
                locality: Some("Cupertino".to_string()),
                ..Placemark::default()
            }])
        }
    }

    #[test]
    fn test_format_label() {
        let placemark = Placemark {
            name: Some("Apple Park".to_string()),
            locality: Some("Cupertino".to_string()),
            ..Placemark::default()
        };
        assert_eq!(format_label(&placemark).as_deref(), Some("Apple Park, Cupertino"));
        assert_eq!(format_label(&Placemark::default()), None);
    }

    #[test]
    fn test_missing_component_resets_label() {
        let mut labeler = LiveLocationLabeler::new(Cupertino, MarkerPolicy::default());
        labeler.handle_event(LocationEvent::Update((37.33, -122.01)));
        assert_eq!(labeler.label().as_str(), Some("Apple Park, Cupertino"));

        labeler.handle_event(LocationEvent::Update((37.33, 0.0)));
        assert_eq!(labeler.label(), &LocationLabel::Unresolved);
    }

    #[test]
    fn test_reverse_failure_is_not_fatal() {
        let mut labeler = LiveLocationLabeler::new(Cupertino, MarkerPolicy::default());
        labeler.handle_event(LocationEvent::Update((-1.0, 1.0)));
        assert_eq!(labeler.label(), &LocationLabel::Unresolved);
        assert_eq!(labeler.center(), Some((-1.0, 1.0)));
    }

    #[test]
    fn test_marker_policies() {
        let mut accumulate = LiveLocationLabeler::new(Cupertino, MarkerPolicy::Accumulate);
        let mut replace = LiveLocationLabeler::new(Cupertino, MarkerPolicy::ReplaceLast);
        for point in [(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)] {
            accumulate.handle_event(LocationEvent::Update(point));
            replace.handle_event(LocationEvent::Update(point));
        }
        assert_eq!(accumulate.markers().len(), 3);
        assert_eq!(replace.markers(), &[(3.0, 3.0)]);
    }

    #[test]
    fn test_failed_event_keeps_state() {
        let mut labeler = LiveLocationLabeler::new(Cupertino, MarkerPolicy::default());
        labeler.handle_event(LocationEvent::Update((37.33, -122.01)));
        labeler.handle_event(LocationEvent::Failed(ServiceError::Other("gps lost".into())));
        assert_eq!(labeler.label().as_str(), Some("Apple Park, Cupertino"));
        assert_eq!(labeler.markers().len(), 1);
    }
}
